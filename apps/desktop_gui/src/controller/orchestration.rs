//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::FetchGallery { .. } => "fetch_gallery",
        BackendCommand::SubmitGeneration { .. } => "submit_generation",
        BackendCommand::FetchImage { .. } => "fetch_image",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "La cola de peticiones está llena; inténtalo de nuevo".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "El procesador de peticiones no está disponible; reinicia la aplicación".to_string();
        }
    }
}
