use engine::graphics::{Color, Renderer2d, text_height, text_width};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::path::TracePath;
use crate::phase::GamePhase;
use crate::trace_core::TraceSnapshot;

const COLOR_BACKGROUND: Color = [12, 12, 20, 255];
const COLOR_WAYPOINT_RING: Color = [255, 255, 255, 255];
const COLOR_WAYPOINT_FILL: Color = [140, 109, 253, 255];
const COLOR_TRACE: Color = [234, 234, 234, 255];
const COLOR_COUNTDOWN_TEXT: Color = [255, 255, 255, 255];
const COLOR_COUNTDOWN_BACKDROP: Color = [255, 255, 255, 255];
const COLOR_PANEL_BG: Color = [0, 0, 0, 255];
const COLOR_PANEL_BORDER: Color = [40, 40, 55, 255];
const COLOR_TEXT: Color = [235, 235, 245, 255];
const COLOR_TEXT_DIM: Color = [130, 130, 150, 255];
const COLOR_TEXT_ALERT: Color = [245, 96, 96, 255];
const COLOR_TEXT_DONE: Color = [120, 220, 150, 255];

const WAYPOINT_RADIUS: u32 = 8;
const TRACE_WIDTH: u32 = 4;
const COUNTDOWN_SCALE: u32 = 8;
const COUNTDOWN_BACKDROP_RADIUS: u32 = 60;
const COUNTDOWN_BACKDROP_ALPHA: u8 = 26;

/// Status of one entry in the level indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEntry {
    Completed,
    Ongoing,
    Pending,
}

/// One entry per level: everything before `level` is done, `level` itself
/// is ongoing, the rest pending. `level == level_count` marks the whole
/// run as completed.
pub fn level_entries(level: usize, level_count: usize) -> Vec<LevelEntry> {
    (0..level_count)
        .map(|i| {
            if i < level {
                LevelEntry::Completed
            } else if i == level {
                LevelEntry::Ongoing
            } else {
                LevelEntry::Pending
            }
        })
        .collect()
}

/// Redraws the whole scene from the snapshot: clear, countdown, waypoints,
/// traced segments, phase banners, level indicator. Purely a function of
/// its inputs.
pub fn draw_scene(r: &mut dyn Renderer2d, path: &TracePath, snap: &TraceSnapshot) {
    r.clear(COLOR_BACKGROUND);

    if let Some(secs) = snap.seconds_remaining {
        draw_countdown(r, secs);
    }

    draw_waypoints(r, path);
    draw_trace(r, path, snap);

    match &snap.phase {
        GamePhase::LevelTransition => draw_transition_banner(r, snap),
        GamePhase::Aborted { message } => draw_abort_panel(r, message),
        GamePhase::AllLevelsComplete => draw_complete_banner(r),
        GamePhase::Idle | GamePhase::Running => {}
    }

    draw_level_indicator(r, snap);
    draw_help_line(r);
}

fn draw_countdown(r: &mut dyn Renderer2d, secs: u64) {
    let size = r.size();
    let (cx, cy) = Rect::from_size(size.width, size.height).center();
    r.blend_disc(
        cx as i32,
        cy as i32,
        COUNTDOWN_BACKDROP_RADIUS,
        COLOR_COUNTDOWN_BACKDROP,
        COUNTDOWN_BACKDROP_ALPHA,
    );

    let text = format!("{secs}s");
    let area = Rect::from_size(size.width, size.height);
    draw_text_in(r, area, Anchor::Center, &text, COLOR_COUNTDOWN_TEXT, COUNTDOWN_SCALE);
}

fn draw_waypoints(r: &mut dyn Renderer2d, path: &TracePath) {
    for dot in path.waypoints() {
        let (x, y) = (dot.x.round() as i32, dot.y.round() as i32);
        r.fill_disc(x, y, WAYPOINT_RADIUS + 1, COLOR_WAYPOINT_RING);
        r.fill_disc(x, y, WAYPOINT_RADIUS - 1, COLOR_WAYPOINT_FILL);
    }
}

fn draw_trace(r: &mut dyn Renderer2d, path: &TracePath, snap: &TraceSnapshot) {
    let solid = snap.traced_segments.min(path.len());
    for i in 0..solid {
        let (a, b) = path.segment(i);
        r.draw_line(a.x, a.y, b.x, b.y, TRACE_WIDTH, COLOR_TRACE);
    }

    if solid < path.len() {
        if let Some(t) = snap.active_progress {
            if t > 0.0 {
                let (a, _) = path.segment(solid);
                let tip = path.point_along(solid, t);
                r.draw_line(a.x, a.y, tip.x, tip.y, TRACE_WIDTH, COLOR_TRACE);
            }
        }
    }
}

fn draw_transition_banner(r: &mut dyn Renderer2d, snap: &TraceSnapshot) {
    let fallback = format!("Level {} complete!", snap.level + 1);
    let message = snap.announcement.as_deref().unwrap_or(&fallback);
    draw_message_panel(r, message, COLOR_TEXT, "Press space to continue");
}

fn draw_abort_panel(r: &mut dyn Renderer2d, message: &str) {
    draw_message_panel(r, message, COLOR_TEXT_ALERT, "Press space to dismiss");
}

fn draw_complete_banner(r: &mut dyn Renderer2d) {
    draw_message_panel(
        r,
        "All levels complete!",
        COLOR_TEXT_DONE,
        "Press R to reset",
    );
}

fn draw_message_panel(r: &mut dyn Renderer2d, message: &str, message_color: Color, hint: &str) {
    let size = r.size();
    let scale = 2;
    let text_w = text_width(message, scale).max(text_width(hint, scale));
    let text_h = text_height(message, scale) + 8 + text_height(hint, scale);

    let screen = Rect::from_size(size.width, size.height);
    let panel = screen.place(Size::new(text_w + 24, text_h + 24), Anchor::TopCenter);
    let panel = Rect::new(panel.x, panel.y + 24, panel.w, panel.h);

    r.blend_rect(panel, COLOR_PANEL_BG, 220);
    r.rect_outline(panel, COLOR_PANEL_BORDER);

    let inner = panel.inset(Insets::uniform(12));
    draw_text_in(r, inner, Anchor::TopCenter, message, message_color, scale);
    draw_text_in(r, inner, Anchor::BottomCenter, hint, COLOR_TEXT_DIM, scale);
}

fn draw_level_indicator(r: &mut dyn Renderer2d, snap: &TraceSnapshot) {
    let entries = level_entries(snap.level, snap.level_count);
    let scale = 2;
    let row_h = text_height("L", scale) + 6;
    let marker = 8u32;

    let origin = Rect::from_size(r.size().width, r.size().height).inset(Insets::uniform(12));
    let mut y = origin.y;

    let heading = if snap.level < snap.level_count {
        format!("Level: {}", snap.level + 1)
    } else {
        "Level: done".to_string()
    };
    r.draw_text_scaled(origin.x, y, &heading, COLOR_TEXT, scale);
    y += row_h + 4;

    for (i, entry) in entries.iter().enumerate() {
        let box_rect = Rect::new(origin.x, y, marker, marker);
        match entry {
            LevelEntry::Completed => r.fill_rect(box_rect, COLOR_TEXT_DONE),
            LevelEntry::Ongoing => {
                r.fill_rect(box_rect, COLOR_WAYPOINT_FILL);
                r.rect_outline(box_rect, COLOR_WAYPOINT_RING);
            }
            LevelEntry::Pending => r.rect_outline(box_rect, COLOR_TEXT_DIM),
        }
        let label_color = match entry {
            LevelEntry::Ongoing => COLOR_TEXT,
            _ => COLOR_TEXT_DIM,
        };
        r.draw_text_scaled(
            origin.x + marker + 6,
            y,
            &format!("Level {}", i + 1),
            label_color,
            scale,
        );
        y += row_h;
    }
}

fn draw_help_line(r: &mut dyn Renderer2d) {
    let size = r.size();
    let area = Rect::from_size(size.width, size.height).inset(Insets::uniform(8));
    draw_text_in(
        r,
        area,
        Anchor::BottomCenter,
        "Space start/confirm  S stop  R reset  L retry level",
        COLOR_TEXT_DIM,
        1,
    );
}

fn draw_text_in(
    r: &mut dyn Renderer2d,
    area: Rect,
    anchor: Anchor,
    text: &str,
    color: Color,
    scale: u32,
) {
    let slot = area.place(
        Size::new(text_width(text, scale), text_height(text, scale)),
        anchor,
    );
    r.draw_text_scaled(slot.x, slot.y, text, color, scale);
}
