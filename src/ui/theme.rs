use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── DataSight palette ────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(21, 24, 31);
pub const BG_PANEL: Color32 = Color32::from_rgb(27, 31, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(33, 38, 49);
pub const BG_FIELD: Color32 = Color32::from_rgb(17, 20, 26);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(38, 150, 160, 50);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(47, 53, 66);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(77, 208, 225);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 231, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 160, 176);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 108, 124);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(38, 166, 154);
pub const TODAY_LINE: Color32 = Color32::from_rgb(255, 167, 38);
pub const GRID_LINE: Color32 = Color32::from_rgb(38, 43, 54);
pub const GRID_LINE_STRONG: Color32 = Color32::from_rgb(58, 65, 80);

/// Darkens the completed share of a bar.
pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);

/// Outline and arrow colour for critical-path items.
pub const CRITICAL: Color32 = Color32::from_rgb(239, 83, 80);
pub const ARROW: Color32 = Color32::from_rgb(118, 128, 148);
pub const GROUP_TEXT: Color32 = Color32::from_rgb(188, 198, 214);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const ROW_HEIGHT: f32 = 28.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const BAR_INSET: f32 = 4.0;
pub const INDENT: f32 = 14.0;
pub const SIDE_PANEL_WIDTH: f32 = 380.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

const WIDGET_ROUNDING: f32 = 4.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.0)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Bar colours ──────────────────────────────────────────────────────────────

const TASK_COLORS: [Color32; 6] = [
    Color32::from_rgb(41, 121, 255),
    Color32::from_rgb(0, 172, 193),
    Color32::from_rgb(67, 160, 71),
    Color32::from_rgb(142, 36, 170),
    Color32::from_rgb(251, 140, 0),
    Color32::from_rgb(94, 53, 177),
];

/// Stable colour for a task id.
pub fn task_color(id: u32) -> Color32 {
    TASK_COLORS[id as usize % TASK_COLORS.len()]
}

// ── Visuals ──────────────────────────────────────────────────────────────────

fn widget(bg: Color32, border: Color32, fg: Stroke) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: Stroke::new(1.0, border),
        fg_stroke: fg,
        rounding: Rounding::same(WIDGET_ROUNDING),
        expansion: 0.0,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.striped = false;

    let w = &mut visuals.widgets;
    w.noninteractive = widget(BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    w.inactive = widget(Color32::from_rgb(38, 44, 56), BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    w.hovered = widget(Color32::from_rgb(48, 55, 69), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    w.active = widget(Color32::from_rgb(56, 64, 80), ACCENT, Stroke::new(2.0, Color32::WHITE));
    w.open = w.active;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);
    });
}
