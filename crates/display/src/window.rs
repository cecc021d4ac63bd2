//! Native window presentation via eframe.
//!
//! `dispatch` only queues the image. The event loop owns the main thread, so
//! it is started from [`DisplaySurface::run_until_closed`] once the pipeline
//! has returned.

use eframe::egui;

use rsurf_common::error::RsurfResult;

use crate::{DisplayServer, DisplaySurface, Presentation};

/// Shows a single image in a fixed-size window.
#[derive(Debug)]
pub struct WindowDisplay {
    server: DisplayServer,
    pending: Option<Presentation>,
}

impl WindowDisplay {
    pub fn new(server: DisplayServer) -> Self {
        Self {
            server,
            pending: None,
        }
    }

    fn open(presentation: Presentation) -> anyhow::Result<()> {
        let (w, h) = presentation.image.dimensions();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(presentation.title.clone())
                .with_inner_size([w as f32, h as f32])
                .with_resizable(false),
            ..Default::default()
        };

        let title = presentation.title.clone();
        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| Box::new(ImageViewer::new(presentation))),
        )
        .map_err(|e| anyhow::anyhow!("window launch failed: {e}"))
    }
}

impl DisplaySurface for WindowDisplay {
    fn is_available(&self) -> bool {
        self.server.is_interactive()
    }

    fn dispatch(&mut self, presentation: Presentation) -> RsurfResult<()> {
        tracing::debug!(title = %presentation.title, "Queued image for window");
        if self.pending.replace(presentation).is_some() {
            tracing::warn!("Replacing an image that was never shown");
        }
        Ok(())
    }

    fn run_until_closed(&mut self) {
        let Some(presentation) = self.pending.take() else {
            return;
        };
        if let Err(e) = Self::open(presentation) {
            tracing::warn!(error = %e, "Could not show render window");
        }
    }
}

struct ImageViewer {
    presentation: Presentation,
    texture: Option<egui::TextureHandle>,
}

impl ImageViewer {
    fn new(presentation: Presentation) -> Self {
        Self {
            presentation,
            texture: None,
        }
    }
}

impl eframe::App for ImageViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let image = &self.presentation.image;
        let texture = self.texture.get_or_insert_with(|| {
            let size = [image.width() as usize, image.height() as usize];
            ctx.load_texture(
                "render",
                egui::ColorImage::from_rgb(size, image.as_raw()),
                egui::TextureOptions::NEAREST,
            )
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.image((texture.id(), texture.size_vec2()));
            });
    }
}
