//! Backend worker: drains UI commands on its own runtime and answers on the
//! event channel. Commands run serially, so replies for one command never
//! interleave with another's and modal updates stay ordered.

use crossbeam_channel::{Receiver, Sender};

use client_core::{GalleryClient, GenerationOutcome};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::PreviewImage;

pub fn launch(client: GalleryClient, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "No se pudo iniciar el procesador de red: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchGallery { character_id } => {
                        tracing::info!(character_id = character_id.0, "backend: fetch_gallery");
                        // A listing failure is reported as an empty set: the
                        // page never distinguished the two, and the gallery
                        // grid renders the same informational empty state.
                        let images = match client.fetch_gallery(character_id).await {
                            Ok(images) => images,
                            Err(err) => {
                                tracing::warn!(
                                    character_id = character_id.0,
                                    "gallery listing failed, reporting an empty set: {err:#}"
                                );
                                Vec::new()
                            }
                        };
                        let _ = ui_tx.try_send(UiEvent::GalleryLoaded {
                            character_id,
                            images,
                        });
                    }
                    BackendCommand::SubmitGeneration {
                        character_id,
                        prompt,
                    } => {
                        tracing::info!(
                            character_id = character_id.0,
                            prompt_len = prompt.len(),
                            "backend: submit_generation"
                        );
                        let outcome = GenerationOutcome::from_reply(
                            client.submit_generation(character_id, &prompt).await,
                        );
                        let _ = ui_tx.try_send(UiEvent::GenerationFinished {
                            character_id,
                            outcome,
                        });
                    }
                    BackendCommand::FetchImage { url } => {
                        let event = match client.download_image(&url).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => UiEvent::ImageLoaded { url, image },
                                Err(reason) => {
                                    tracing::warn!("image decode failed for '{url}': {reason}");
                                    UiEvent::ImageFailed { url, reason }
                                }
                            },
                            Err(err) => {
                                tracing::warn!("image download failed for '{url}': {err:#}");
                                UiEvent::ImageFailed {
                                    url,
                                    reason: err.to_string(),
                                }
                            }
                        };
                        let _ = ui_tx.try_send(event);
                    }
                }
            }
        });
    });
}

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic.thumbnail(1024, 1024).to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
