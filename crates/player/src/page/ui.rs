use super::PlayerPage;
use core_types::Rect;
use egui::{
    Align, Align2, CentralPanel, Color32, Context, FontId, Frame, Layout, Margin, Order, RichText,
    Sense, Stroke, StrokeKind, Ui, vec2,
};
use governor::{COMPLETION_THRESHOLD, ToastPhase, ad_button_region, toast::TOAST_FADE};

/// Something the user asked for this frame. The caller applies it after the
/// pass so the page is not borrowed by the view while it changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Back,
    CloseHelper,
    ReloadSurface,
    /// Link with new-tab semantics.
    OpenLink(String),
}

const PANEL_BG: Color32 = Color32::from_rgb(31, 41, 55);
const HELPER_BG: Color32 = Color32::from_rgb(17, 24, 39);
const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const DONE_BG: Color32 = Color32::from_rgb(22, 163, 74);
const TOAST_BG: Color32 = Color32::from_rgb(76, 175, 80);

impl PlayerPage {
    pub fn ui_content(&mut self, ctx: &Context) -> Option<ViewAction> {
        let action = CentralPanel::default()
            .show(ctx, |ui| {
                if self.governor.is_none() {
                    return error_view(ui);
                }
                let header = self.ui_header(ui);
                ui.add_space(12.0);
                let instructions = self.ui_instructions(ui);
                ui.add_space(16.0);
                self.ui_surface(ui);
                ui.add_space(8.0);
                let source = self.ui_source(ui);
                header.or(instructions).or(source)
            })
            .inner;

        self.ui_toasts(ctx);
        action
    }

    fn ui_header(&self, ui: &mut Ui) -> Option<ViewAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading(RichText::new(&self.params.title).strong());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("← Back").clicked() {
                    action = Some(ViewAction::Back);
                }
                if ui.button("Reload player").clicked() {
                    action = Some(ViewAction::ReloadSurface);
                }
            });
        });
        action
    }

    fn ui_instructions(&self, ui: &mut Ui) -> Option<ViewAction> {
        let state = self.state().copied()?;
        let mut action = None;

        Frame::new()
            .fill(PANEL_BG)
            .corner_radius(8.0)
            .inner_margin(Margin::same(16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Video Instructions")
                            .size(18.0)
                            .strong()
                            .color(Color32::WHITE),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            action = Some(ViewAction::CloseHelper);
                        }
                    });
                });
                ui.add_space(8.0);

                if state.overlay_visible && !state.clicks_completed {
                    ad_helper(ui, state.click_count);
                } else if state.clicks_completed {
                    Frame::new()
                        .fill(DONE_BG)
                        .corner_radius(8.0)
                        .inner_margin(Margin::same(12))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(
                                RichText::new("✅ Ad Verification Complete!")
                                    .strong()
                                    .color(Color32::WHITE),
                            );
                            ui.label(
                                RichText::new("Your video is now ready to play.")
                                    .color(Color32::WHITE),
                            );
                        });
                } else {
                    ui.label(
                        RichText::new("The video is loading. Please wait...").color(Color32::WHITE),
                    );
                }
            });
        action
    }

    fn ui_surface(&mut self, ui: &mut Ui) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(vec2(width, width * 9.0 / 16.0), Sense::click());
        let surface = Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height());
        self.set_surface_rect(surface);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, Color32::BLACK);
        painter.text(
            rect.left_top() + vec2(12.0, 10.0),
            Align2::LEFT_TOP,
            "TeraBox Video Player",
            FontId::proportional(12.0),
            Color32::GRAY,
        );
        if let Some(src) = self.embed_url() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                src,
                FontId::monospace(11.0),
                Color32::from_gray(140),
            );
        }

        if self.state().is_some_and(|s| s.overlay_visible) {
            let r = ad_button_region(surface);
            let region = egui::Rect::from_min_size(egui::pos2(r.x, r.y), vec2(r.width, r.height));
            painter.rect_stroke(region, 25.0, Stroke::new(2.0, ACCENT), StrokeKind::Outside);
            painter.text(
                region.center_top() - vec2(0.0, 6.0),
                Align2::CENTER_BOTTOM,
                "↓ CLICK HERE ↓",
                FontId::proportional(13.0),
                Color32::YELLOW,
            );
        }
    }

    fn ui_source(&self, ui: &mut Ui) -> Option<ViewAction> {
        let url = self.params.source_url.as_deref()?;
        let mut action = None;
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Source:").small().color(Color32::GRAY));
            if ui.link(RichText::new(url).small()).clicked() {
                action = Some(ViewAction::OpenLink(url.to_string()));
            }
        });
        action
    }

    fn ui_toasts(&self, ctx: &Context) {
        for (i, toast) in self.toasts.iter().enumerate() {
            let id = egui::Id::new(("player.toast", toast.id));
            let opacity = ctx.animate_bool_with_time(
                id.with("fade"),
                toast.phase == ToastPhase::Visible,
                TOAST_FADE.as_secs_f32(),
            );
            egui::Area::new(id)
                .order(Order::Foreground)
                .anchor(Align2::CENTER_TOP, vec2(0.0, 20.0 + i as f32 * 56.0))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.multiply_opacity(opacity);
                    Frame::new()
                        .fill(TOAST_BG)
                        .corner_radius(4.0)
                        .inner_margin(Margin::symmetric(24, 12))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(&toast.text)
                                    .size(16.0)
                                    .strong()
                                    .color(Color32::WHITE),
                            );
                        });
                });
        }
    }
}

fn ad_helper(ui: &mut Ui, click_count: u32) {
    Frame::new()
        .fill(HELPER_BG)
        .stroke(Stroke::new(2.0, ACCENT))
        .corner_radius(8.0)
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new("Ad Verification Required")
                    .size(16.0)
                    .strong()
                    .color(ACCENT),
            );
            ui.label(
                RichText::new(format!(
                    "You need to click the \"Watch an advertisement\" button {COMPLETION_THRESHOLD} times to access the video."
                ))
                .color(Color32::WHITE),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                for i in 0..COMPLETION_THRESHOLD {
                    let (rect, _) = ui.allocate_exact_size(vec2(24.0, 24.0), Sense::hover());
                    let done = i < click_count;
                    let fill = if done {
                        Color32::from_rgb(34, 197, 94)
                    } else {
                        Color32::from_gray(75)
                    };
                    ui.painter().circle_filled(rect.center(), 12.0, fill);
                    if done {
                        ui.painter().text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            "✓",
                            FontId::proportional(12.0),
                            Color32::WHITE,
                        );
                    }
                }
            });
            ui.label(
                RichText::new(format!(
                    "Progress: {}/{COMPLETION_THRESHOLD} clicks",
                    click_count.min(COMPLETION_THRESHOLD)
                ))
                .color(Color32::WHITE),
            );
            ui.label(
                RichText::new(
                    "Popup tabs will be automatically blocked. You don't need to view any ads.",
                )
                .small()
                .color(Color32::GRAY),
            );
        });
}

fn error_view(ui: &mut Ui) -> Option<ViewAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.heading(RichText::new("Error Loading Video").strong());
        ui.add_space(8.0);
        ui.label("No video ID was provided.");
        ui.add_space(8.0);
        if ui.button("Go Back").clicked() {
            action = Some(ViewAction::Back);
        }
    });
    action
}
