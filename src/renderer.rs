use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    },
};

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::entities::{Bullet, Enemy, Particle, Player, Star};
use crate::stage::{Phase, STAGES};
use crate::world::World;

/// Canvas units between the scanlines used to fill solid shapes
const FILL_STEP: f64 = 2.0;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub phase: Phase,
    pub world: &'a World,
    pub score: u32,
    pub stage_number: usize,
    pub high_scores: &'a [u32],
    /// Highlighted row on the stage select screen
    pub selected_stage: usize,
}

/// Something that paints itself onto the game canvas. Canvas y grows upward,
/// so implementations flip world y with [`flip_y`].
pub trait Draw {
    fn draw(&self, ctx: &mut Context<'_>);
}

pub fn flip_y(y: f64) -> f64 {
    CANVAS_HEIGHT - y
}

/// Scales an RGB color toward black. Named colors cannot be blended and are
/// kept until they are mostly faded.
pub fn fade(color: Color, alpha: f64) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (f64::from(c) * alpha).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other if alpha > 0.3 => other,
        _ => Color::DarkGray,
    }
}

/// Largest rect inside `area` with the canvas aspect ratio, centered.
/// Terminal cells are about twice as tall as they are wide.
pub fn fit_canvas(area: Rect) -> Rect {
    let aspect = CANVAS_WIDTH / CANVAS_HEIGHT * 2.0;
    let mut height = area.height;
    let mut width = (f64::from(height) * aspect).round() as u16;
    if width > area.width {
        width = area.width;
        height = (f64::from(width) / aspect).round() as u16;
    }
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Horizontal scanlines between two x edges that vary linearly with y
fn fill_rows(
    ctx: &mut Context<'_>,
    top: f64,
    bottom: f64,
    edges: impl Fn(f64) -> (f64, f64),
    color: Color,
) {
    let mut y = top;
    while y <= bottom {
        let (x1, x2) = edges(y);
        ctx.draw(&CanvasLine::new(x1, flip_y(y), x2, flip_y(y), color));
        y += FILL_STEP;
    }
}

impl Draw for Star {
    fn draw(&self, ctx: &mut Context<'_>) {
        let level = (255.0 * self.brightness()).round() as u8;
        ctx.draw(&Points {
            coords: &[(self.x, flip_y(self.y))],
            color: Color::Rgb(level, level, level),
        });
    }
}

impl Draw for Player {
    /// Solid triangle, nose up
    fn draw(&self, ctx: &mut Context<'_>) {
        if !self.is_visible() {
            return;
        }
        let half = self.size / 2.0;
        let top = self.y - half;
        let x = self.x;
        fill_rows(
            ctx,
            top,
            self.y + half,
            |y| {
                let spread = (y - top) / 2.0;
                (x - spread, x + spread)
            },
            self.color,
        );
    }
}

impl Draw for Enemy {
    /// Solid square
    fn draw(&self, ctx: &mut Context<'_>) {
        let half = self.size / 2.0;
        let x = self.x;
        fill_rows(
            ctx,
            self.y - half,
            self.y + half,
            |_| (x - half, x + half),
            self.color,
        );
    }
}

impl Draw for Bullet {
    fn draw(&self, ctx: &mut Context<'_>) {
        ctx.draw(&Circle {
            x: self.x,
            y: flip_y(self.y),
            radius: self.size,
            color: self.color,
        });
        ctx.draw(&Points {
            coords: &[(self.x, flip_y(self.y))],
            color: self.color,
        });
    }
}

impl Draw for Particle {
    fn draw(&self, ctx: &mut Context<'_>) {
        ctx.draw(&Points {
            coords: &[(self.x, flip_y(self.y))],
            color: fade(self.color, self.alpha),
        });
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to phase-specific screens
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let game_area = fit_canvas(Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        });

        match view.phase {
            Phase::StageSelect => {
                self.render_canvas(frame, view, game_area, false);
                self.render_stage_select(frame, view, game_area);
            }
            Phase::Transition(banner) => {
                self.render_canvas(frame, view, game_area, true);
                self.render_hud(frame, view, area);
                self.render_banner(frame, banner.text(), game_area);
            }
            Phase::Playing => {
                self.render_canvas(frame, view, game_area, true);
                self.render_hud(frame, view, area);
            }
            Phase::GameOver => {
                self.render_canvas(frame, view, game_area, true);
                self.render_hud(frame, view, area);
                self.render_end_screen(frame, view, game_area, false);
            }
            Phase::Won => {
                self.render_canvas(frame, view, game_area, false);
                self.render_hud(frame, view, area);
                self.render_end_screen(frame, view, game_area, true);
            }
        }

        let controls = match view.phase {
            Phase::StageSelect => "[1-3/Arrows: Choose] [Enter: Start] [Q: Quit]",
            Phase::GameOver | Phase::Won => "[R/Enter: Stage Select] [Q: Quit]",
            _ => "[WASD/Arrows: Move] [Space: Fire] [Q: Quit]",
        };
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                controls,
                Style::default().fg(Color::DarkGray),
            )))
            .centered(),
            controls_area,
        );
    }

    /// Starfield plus, when `with_entities`, everything alive in the world
    fn render_canvas(&self, frame: &mut Frame, view: &RenderView, area: Rect, with_entities: bool) {
        let world = view.world;
        // The ship is gone once the game is lost
        let show_player = with_entities && view.phase != Phase::GameOver;

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .marker(Marker::Braille)
            .background_color(Color::Black)
            .x_bounds([0.0, CANVAS_WIDTH])
            .y_bounds([0.0, CANVAS_HEIGHT])
            .paint(move |ctx| {
                for star in &world.stars {
                    star.draw(ctx);
                }
                if !with_entities {
                    return;
                }
                ctx.layer();
                for particle in &world.particles {
                    particle.draw(ctx);
                }
                for enemy in &world.enemies {
                    enemy.draw(ctx);
                }
                for bullet in world.enemy_bullets.iter().chain(&world.player_bullets) {
                    bullet.draw(ctx);
                }
                if show_player {
                    world.player.draw(ctx);
                }
            });

        frame.render_widget(canvas, area);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, area: Rect) {
        let stats = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Stage: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.stage_number),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats).centered(), stats_area);
    }

    fn render_banner(&self, frame: &mut Frame, text: &str, game_area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(text.to_string()).centered().bold().yellow(),
        ];
        let width = (text.chars().count() as u16 + 6).min(game_area.width);
        render_box(frame, lines, game_area, width, 4, Color::Yellow);
    }

    fn render_stage_select(&self, frame: &mut Frame, view: &RenderView, game_area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("GEOMETRIC BARRAGE").centered().bold().cyan(),
            Line::from(""),
        ];
        for (idx, stage) in STAGES.iter().enumerate() {
            let best = view.high_scores.get(idx).copied().unwrap_or(0);
            let selected = idx == view.selected_stage;
            let marker = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{stage_name}", stage_name = stage.name), style),
                Span::styled(
                    format!("  High: {best}"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Press 1-3 or Enter to start").centered().white());

        let height = lines.len() as u16 + 2;
        render_box(frame, lines, game_area, 46, height, Color::Cyan);
    }

    fn render_end_screen(&self, frame: &mut Frame, view: &RenderView, game_area: Rect, won: bool) {
        let (title, score_label, color) = if won {
            ("YOU WIN!", "Total Score", Color::Green)
        } else {
            ("GAME OVER!", "Final Score", Color::Red)
        };
        let lines = vec![
            Line::from(""),
            Line::from(title).centered().bold().fg(color),
            Line::from(""),
            Line::from(format!("{score_label}: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press R to choose a stage").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];
        render_box(frame, lines, game_area, 32, 9, color);
    }
}

/// Bordered paragraph centered over `within`, clearing what is beneath it
fn render_box(
    frame: &mut Frame,
    lines: Vec<Line<'static>>,
    within: Rect,
    width: u16,
    height: u16,
    border: Color,
) {
    let width = width.min(within.width);
    let height = height.min(within.height);
    let area = Rect {
        x: within.x + (within.width - width) / 2,
        y: within.y + (within.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Banner;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    fn render_text(phase: Phase, score: u32) -> String {
        let world = World::new(&mut StdRng::seed_from_u64(3));
        let high_scores = [1200, 0, 0];
        let view = RenderView {
            phase,
            world: &world,
            score,
            stage_number: 1,
            high_scores: &high_scores,
            selected_stage: 0,
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 45)).expect("test terminal");
        terminal
            .draw(|frame| GameRenderer::new().render(frame, &view))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_fit_canvas_keeps_aspect_in_wide_terminal() {
        let fitted = fit_canvas(Rect::new(0, 0, 200, 40));
        assert_eq!(fitted.height, 40);
        assert_eq!(fitted.width, 60);
        assert_eq!(fitted.x, 70);
    }

    #[test]
    fn test_fit_canvas_in_narrow_terminal() {
        let fitted = fit_canvas(Rect::new(0, 0, 30, 60));
        assert_eq!(fitted.width, 30);
        assert_eq!(fitted.height, 20);
        assert_eq!(fitted.y, 20);
    }

    #[test]
    fn test_fade_scales_rgb() {
        assert_eq!(fade(Color::Rgb(200, 100, 0), 0.5), Color::Rgb(100, 50, 0));
        assert_eq!(fade(Color::Rgb(200, 100, 0), -1.0), Color::Rgb(0, 0, 0));
        assert_eq!(fade(Color::Red, 0.9), Color::Red);
        assert_eq!(fade(Color::Red, 0.1), Color::DarkGray);
    }

    #[test]
    fn test_flip_y() {
        assert_eq!(flip_y(0.0), CANVAS_HEIGHT);
        assert_eq!(flip_y(CANVAS_HEIGHT), 0.0);
    }

    #[test]
    fn test_stage_select_lists_stages_and_scores() {
        let text = render_text(Phase::StageSelect, 0);
        assert!(text.contains("GEOMETRIC BARRAGE"));
        assert!(text.contains("Stage 3: Chaos Vortex"));
        assert!(text.contains("High: 1200"));
    }

    #[test]
    fn test_banner_and_hud_during_intro() {
        let text = render_text(Phase::Transition(Banner::Intro(0)), 0);
        assert!(text.contains("Stage 1: First Contact"));
        assert!(text.contains("Score: 0"));
    }

    #[test]
    fn test_end_screens_show_score() {
        assert!(render_text(Phase::GameOver, 4321).contains("Final Score: 4321"));
        assert!(render_text(Phase::Won, 9876).contains("Total Score: 9876"));
    }
}
