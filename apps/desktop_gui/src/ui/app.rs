//! Catalog gallery application: hero banner, card carousels, and the two
//! modal workflows (generation and gallery).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use client_core::{GenerationOutcome, PageContext};
use shared::catalog::{CatalogCharacter, CatalogDocument};
use shared::domain::CharacterId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::carousel::{CarouselState, HeroRotator, ViewportMode};
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

const CARD_IMAGE_SIZE: egui::Vec2 = egui::vec2(200.0, 200.0);
const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(120.0, 120.0);
const RESULT_IMAGE_SIZE: egui::Vec2 = egui::vec2(360.0, 360.0);
const HERO_HEIGHT: f32 = 260.0;

const EMPTY_PROMPT_TEXT: &str = "Escribe un prompt antes de generar.";
const CONNECTION_ERROR_TEXT: &str = "Error de conexión. Inténtalo de nuevo.";
const DEFAULT_REJECTION_TEXT: &str = "No se pudo generar la imagen.";
const EMPTY_GALLERY_TEXT: &str = "Aún no has generado imágenes de este personaje.";

/// RGBA image decoded on the worker thread, ready for texture upload.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum ImageSlot {
    Pending,
    Ready(egui::TextureHandle),
    Failed,
}

enum ImageView {
    Ready(egui::TextureHandle),
    Loading,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Generation,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenerationView {
    Success { image_urls: Vec<String> },
    Rejected { message: String },
    ConnectionError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GalleryGrid {
    Loading,
    Images(Vec<String>),
    Empty,
}

/// The transient state of the currently open dialog. Dropped on close; a
/// fresh session is built on every open, so a reopened modal never sees the
/// previous character or any unsubmitted input.
enum ModalSession {
    Generation {
        character_id: CharacterId,
        character_name: String,
        tags: Vec<String>,
        prompt: String,
        submitting: bool,
        result: Option<GenerationView>,
    },
    Gallery {
        character_id: CharacterId,
        character_name: String,
        grid: GalleryGrid,
    },
}

struct CardRow {
    character: CatalogCharacter,
    carousel: CarouselState,
}

enum ViewState {
    Catalog,
    Login,
}

pub struct GalleryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    /// `None` means the page context was absent at startup: the catalog
    /// still renders, but nothing is wired (no timers, no modals, no
    /// network).
    context: Option<PageContext>,
    hero_title: String,
    hero_description: String,
    hero_slides: Vec<String>,
    hero: Option<HeroRotator>,
    cards: Vec<CardRow>,
    modal: Option<ModalSession>,
    expanded_image: Option<String>,
    textures: HashMap<String, ImageSlot>,
    last_width: Option<f32>,
    status: String,
    view_state: ViewState,
}

impl GalleryApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        catalog: CatalogDocument,
        context: Option<PageContext>,
    ) -> Self {
        let wired = context.is_some();
        let hero = if wired {
            HeroRotator::new(catalog.hero_slides.len(), Instant::now())
        } else {
            None
        };
        let cards = catalog
            .characters
            .into_iter()
            .map(|character| CardRow {
                carousel: CarouselState::new(character.frames.len()),
                character,
            })
            .collect();

        Self {
            cmd_tx,
            ui_rx,
            context,
            hero_title: catalog.hero_title,
            hero_description: catalog.hero_description,
            hero_slides: catalog.hero_slides,
            hero,
            cards,
            modal: None,
            expanded_image: None,
            textures: HashMap::new(),
            last_width: None,
            status: if wired {
                "Listo".to_string()
            } else {
                "Contexto de página no disponible; funciones de generación desactivadas"
                    .to_string()
            },
            view_state: ViewState::Catalog,
        }
    }

    fn wired(&self) -> bool {
        self.context.is_some()
    }

    fn current_mode(&self) -> ViewportMode {
        ViewportMode::from_width(self.last_width.unwrap_or(0.0))
    }

    // ---- event pump -------------------------------------------------------

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::GalleryLoaded {
                    character_id,
                    images,
                } => self.apply_gallery_result(character_id, images),
                UiEvent::GenerationFinished {
                    character_id,
                    outcome,
                } => self.apply_generation_result(character_id, outcome),
                UiEvent::ImageLoaded { url, image } => {
                    let texture = ctx.load_texture(
                        url.clone(),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [image.width, image.height],
                            &image.rgba,
                        ),
                        egui::TextureOptions::LINEAR,
                    );
                    self.textures.insert(url, ImageSlot::Ready(texture));
                }
                UiEvent::ImageFailed { url, reason } => {
                    tracing::warn!("image unavailable at '{url}': {reason}");
                    self.textures.insert(url, ImageSlot::Failed);
                }
            }
        }
    }

    /// A gallery completion only applies to the session it was fetched for;
    /// anything else is a late response for a closed or reopened modal.
    fn apply_gallery_result(&mut self, character_id: CharacterId, images: Vec<String>) {
        match self.modal.as_mut() {
            Some(ModalSession::Gallery {
                character_id: open_id,
                grid,
                ..
            }) if *open_id == character_id => {
                *grid = if images.is_empty() {
                    GalleryGrid::Empty
                } else {
                    GalleryGrid::Images(images)
                };
            }
            _ => {
                tracing::debug!(
                    character_id = character_id.0,
                    "discarding gallery result for a stale session"
                );
            }
        }
    }

    /// Single completion point of the submit workflow: whatever the outcome,
    /// the submitting state is cleared here and nowhere else.
    fn apply_generation_result(&mut self, character_id: CharacterId, outcome: GenerationOutcome) {
        match self.modal.as_mut() {
            Some(ModalSession::Generation {
                character_id: open_id,
                submitting,
                result,
                ..
            }) if *open_id == character_id => {
                *submitting = false;
                *result = Some(match outcome {
                    GenerationOutcome::Success { image_urls } => {
                        GenerationView::Success { image_urls }
                    }
                    GenerationOutcome::Rejected { message } => GenerationView::Rejected { message },
                    GenerationOutcome::TransportFailed => GenerationView::ConnectionError,
                });
            }
            _ => {
                tracing::debug!(
                    character_id = character_id.0,
                    "discarding generation result for a stale session"
                );
            }
        }
    }

    // ---- modal lifecycle --------------------------------------------------

    fn open_modal(&mut self, kind: ModalKind, card_index: usize) {
        let Some(context) = &self.context else {
            return;
        };
        if !context.authenticated {
            tracing::info!("unauthenticated modal open, showing the login view");
            self.view_state = ViewState::Login;
            return;
        }
        let Some(card) = self.cards.get(card_index) else {
            return;
        };
        let character_id = card.character.id;
        let character_name = card.character.name.clone();

        self.modal = Some(match kind {
            ModalKind::Generation => ModalSession::Generation {
                character_id,
                character_name,
                tags: card.character.tags.clone(),
                prompt: String::new(),
                submitting: false,
                result: None,
            },
            ModalKind::Gallery => {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::FetchGallery { character_id },
                    &mut self.status,
                );
                ModalSession::Gallery {
                    character_id,
                    character_name,
                    grid: GalleryGrid::Loading,
                }
            }
        });
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        let Some(mut session) = self.modal.take() else {
            return;
        };
        let mut close = false;

        let response = egui::Modal::new(egui::Id::new("catalog_modal")).show(ctx, |ui| {
            ui.set_width(440.0);
            match &mut session {
                ModalSession::Generation {
                    character_id,
                    character_name,
                    tags,
                    prompt,
                    submitting,
                    result,
                } => {
                    ui.heading(format!("Generar imagen de {character_name}"));
                    ui.separator();

                    if !tags.is_empty() && !*submitting {
                        ui.horizontal_wrapped(|ui| {
                            for tag in tags.iter() {
                                if ui.small_button(tag.as_str()).clicked() {
                                    append_tag(prompt, tag);
                                }
                            }
                        });
                    }

                    ui.add_enabled(
                        !*submitting,
                        egui::TextEdit::multiline(prompt)
                            .hint_text("Describe la imagen que quieres generar...")
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );

                    if *submitting {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Generando imagen...");
                        });
                    } else if ui.button("Generar").clicked() {
                        if !prompt_ready(prompt) {
                            // Synchronous and blocking; nothing is mutated.
                            show_blocking_notice(EMPTY_PROMPT_TEXT);
                        } else {
                            *submitting = true;
                            *result = None;
                            dispatch_backend_command(
                                &self.cmd_tx,
                                BackendCommand::SubmitGeneration {
                                    character_id: *character_id,
                                    prompt: prompt.clone(),
                                },
                                &mut self.status,
                            );
                        }
                    }

                    match result.clone() {
                        Some(GenerationView::Success { image_urls }) => {
                            ui.colored_label(
                                egui::Color32::from_rgb(0x2e, 0xa0, 0x43),
                                "¡Imagen generada con éxito!",
                            );
                            for url in image_urls {
                                if self.show_image(ui, &url, RESULT_IMAGE_SIZE, true) {
                                    self.expanded_image = Some(url.clone());
                                }
                            }
                        }
                        Some(GenerationView::Rejected { message }) => {
                            let message = if message.is_empty() {
                                DEFAULT_REJECTION_TEXT.to_string()
                            } else {
                                message
                            };
                            ui.colored_label(ui.visuals().error_fg_color, format!("Error: {message}"));
                        }
                        Some(GenerationView::ConnectionError) => {
                            ui.colored_label(ui.visuals().error_fg_color, CONNECTION_ERROR_TEXT);
                        }
                        None => {}
                    }

                    ui.separator();
                    if ui.button("Cerrar").clicked() {
                        close = true;
                    }
                }
                ModalSession::Gallery {
                    character_name,
                    grid,
                    ..
                } => {
                    ui.heading(format!("Galería de {character_name}"));
                    ui.separator();

                    match grid.clone() {
                        GalleryGrid::Loading => {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Cargando tus imágenes...");
                            });
                        }
                        GalleryGrid::Empty => {
                            ui.label(EMPTY_GALLERY_TEXT);
                        }
                        GalleryGrid::Images(urls) => {
                            egui::ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
                                ui.horizontal_wrapped(|ui| {
                                    for url in urls {
                                        if self.show_image(ui, &url, THUMBNAIL_SIZE, true) {
                                            self.expanded_image = Some(url.clone());
                                        }
                                    }
                                });
                            });
                        }
                    }

                    ui.separator();
                    if ui.button("Cerrar").clicked() {
                        close = true;
                    }
                }
            }
        });

        // Backdrop clicks and Escape close the dialog; clicks inside the
        // content area do not reach the backdrop.
        if response.should_close() {
            close = true;
        }

        self.modal = if close { None } else { Some(session) };
    }

    // ---- catalog view -----------------------------------------------------

    fn show_catalog(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status.clone());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_hero(ui);
                ui.add_space(16.0);
                let card_count = self.cards.len();
                ui.horizontal_wrapped(|ui| {
                    for index in 0..card_count {
                        self.show_card(ui, index);
                    }
                });
            });
        });
    }

    fn show_hero(&mut self, ui: &mut egui::Ui) {
        if !self.hero_title.is_empty() {
            ui.heading(self.hero_title.clone());
        }
        if !self.hero_description.is_empty() {
            ui.label(self.hero_description.clone());
        }
        if self.hero_slides.is_empty() {
            return;
        }
        let index = self.hero.as_ref().map_or(0, HeroRotator::index);
        let slide = self.hero_slides[index % self.hero_slides.len()].clone();
        let width = ui.available_width().min(900.0);
        self.show_image(ui, &slide, egui::vec2(width, HERO_HEIGHT), false);
    }

    fn show_card(&mut self, ui: &mut egui::Ui, index: usize) {
        let (character_id, name, frame_url, frame_count, current) = {
            let card = &self.cards[index];
            (
                card.character.id,
                card.character.name.clone(),
                card.character
                    .frames
                    .get(card.carousel.current())
                    .cloned(),
                card.character.frames.len(),
                card.carousel.current(),
            )
        };

        let response = ui
            .push_id(character_id.0, |ui| {
                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(CARD_IMAGE_SIZE.x);
                        match frame_url {
                            Some(url) => {
                                self.show_image(ui, &url, CARD_IMAGE_SIZE, false);
                            }
                            None => {
                                ui.add_sized(CARD_IMAGE_SIZE, egui::Label::new("Sin imágenes"));
                            }
                        }
                        if frame_count > 1 {
                            draw_indicators(ui, frame_count, current);
                        }
                        ui.label(egui::RichText::new(&name).strong());
                        if self.wired() {
                            ui.horizontal(|ui| {
                                if ui.button("Generar imagen").clicked() {
                                    self.open_modal(ModalKind::Generation, index);
                                }
                                if ui.button("Ver galería").clicked() {
                                    self.open_modal(ModalKind::Gallery, index);
                                }
                            });
                        }
                    });
            })
            .response;

        if self.wired() {
            let hovered = ui.rect_contains_pointer(response.rect);
            let mode = self.current_mode();
            self.cards[index]
                .carousel
                .set_hovering(hovered, mode, Instant::now());
        }
    }

    // ---- login view -------------------------------------------------------

    fn show_login_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("Inicia sesión para continuar");
                ui.label("Necesitas una sesión activa para generar imágenes o ver tu galería.");
                if let Some(context) = &self.context {
                    ui.monospace(context.login_url.clone());
                }
                ui.add_space(12.0);
                if ui.button("Volver al catálogo").clicked() {
                    self.view_state = ViewState::Catalog;
                }
            });
        });
    }

    // ---- expanded preview -------------------------------------------------

    fn show_expanded_image(&mut self, ctx: &egui::Context) {
        let Some(url) = self.expanded_image.clone() else {
            return;
        };
        let mut keep_open = true;
        egui::Window::new("Imagen")
            .open(&mut keep_open)
            .resizable(true)
            .show(ctx, |ui| {
                if let ImageView::Ready(texture) = self.image_slot(&url) {
                    let max_size = ui.available_size();
                    let mut size = texture.size_vec2();
                    let scale = (max_size.x / size.x).min(max_size.y / size.y).min(1.0);
                    size *= scale;
                    ui.add(egui::Image::new(&texture).fit_to_exact_size(size));
                } else {
                    ui.label("Imagen no disponible.");
                }
            });
        if !keep_open {
            self.expanded_image = None;
        }
    }

    // ---- image pipeline ---------------------------------------------------

    /// Looks up a texture, requesting the download exactly once per URL.
    fn image_slot(&mut self, url: &str) -> ImageView {
        if !self.textures.contains_key(url) {
            if self.wired() {
                self.textures.insert(url.to_string(), ImageSlot::Pending);
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::FetchImage {
                        url: url.to_string(),
                    },
                    &mut self.status,
                );
            } else {
                self.textures.insert(url.to_string(), ImageSlot::Failed);
            }
        }
        match self.textures.get(url) {
            Some(ImageSlot::Ready(texture)) => ImageView::Ready(texture.clone()),
            Some(ImageSlot::Failed) => ImageView::Failed,
            _ => ImageView::Loading,
        }
    }

    /// Renders one image slot; returns true when a clickable image was
    /// clicked.
    fn show_image(&mut self, ui: &mut egui::Ui, url: &str, size: egui::Vec2, clickable: bool) -> bool {
        match self.image_slot(url) {
            ImageView::Ready(texture) => {
                let image = egui::Image::new(&texture).fit_to_exact_size(size);
                if clickable {
                    ui.add(image.sense(egui::Sense::click())).clicked()
                } else {
                    ui.add(image);
                    false
                }
            }
            ImageView::Loading => {
                ui.add_sized(size, egui::Spinner::new());
                false
            }
            ImageView::Failed => {
                ui.add_sized(size, egui::Label::new("Imagen no disponible"));
                false
            }
        }
    }

    // ---- frame scheduling -------------------------------------------------

    fn repaint_delay(&self, now: Instant) -> Duration {
        let mut next: Option<Instant> = self.hero.as_ref().map(HeroRotator::next_deadline);
        for card in &self.cards {
            if let Some(deadline) = card.carousel.next_deadline() {
                next = Some(next.map_or(deadline, |n| n.min(deadline)));
            }
        }
        let mut delay = match next {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::from_millis(250),
        };

        let waiting_on_backend = self
            .textures
            .values()
            .any(|slot| matches!(slot, ImageSlot::Pending))
            || matches!(
                &self.modal,
                Some(ModalSession::Generation { submitting: true, .. })
                    | Some(ModalSession::Gallery {
                        grid: GalleryGrid::Loading,
                        ..
                    })
            );
        if waiting_on_backend {
            delay = delay.min(Duration::from_millis(100));
        }

        delay.clamp(Duration::from_millis(16), Duration::from_millis(250))
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        let now = Instant::now();
        if self.wired() {
            // The mode is recomputed from the instantaneous width on every
            // observed change, including the first frame. No debounce.
            let width = ctx.screen_rect().width();
            if self.last_width != Some(width) {
                let mode = ViewportMode::from_width(width);
                for card in &mut self.cards {
                    card.carousel.reconcile(mode, now);
                }
                self.last_width = Some(width);
            }

            if let Some(hero) = self.hero.as_mut() {
                hero.poll(now);
            }
            for card in &mut self.cards {
                card.carousel.poll(now);
            }
        }

        match self.view_state {
            ViewState::Login => self.show_login_screen(ctx),
            ViewState::Catalog => self.show_catalog(ctx),
        }
        self.show_modal(ctx);
        self.show_expanded_image(ctx);

        ctx.request_repaint_after(self.repaint_delay(now));
    }
}

fn draw_indicators(ui: &mut egui::Ui, count: usize, active: usize) {
    ui.horizontal(|ui| {
        for index in 0..count {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            let (radius, color) = if index == active {
                (4.0, ui.visuals().strong_text_color())
            } else {
                (3.0, ui.visuals().weak_text_color())
            };
            ui.painter().circle_filled(rect.center(), radius, color);
        }
    });
}

/// An empty or whitespace-only prompt is rejected before any command is
/// queued.
fn prompt_ready(prompt: &str) -> bool {
    !prompt.trim().is_empty()
}

/// Prompt helper for the suggestion chips: appends a tag, comma-separated.
fn append_tag(prompt: &mut String, tag: &str) {
    if prompt.trim().is_empty() {
        *prompt = tag.to_string();
    } else {
        prompt.push_str(", ");
        prompt.push_str(tag);
    }
}

fn show_blocking_notice(text: &str) {
    rfd::MessageDialog::new()
        .set_title("Prompt requerido")
        .set_description(text)
        .set_level(rfd::MessageLevel::Warning)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
