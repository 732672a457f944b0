use crate::collision::Hitbox;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::{
    ANIMATION_FRAMES, Bullet, EXPLOSION_COLORS, EXPLOSION_FRAMES, Enemy, Explosion, Player,
};
use crate::session::GameSession;
use crate::state::{GameState, GameStatus};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const ORANGE: Color = Color::Rgb(255, 165, 0);
/// Shared by the player's death animation and the explosion effect
const FIRE_COLORS: [Color; EXPLOSION_COLORS] = [Color::Yellow, ORANGE, Color::Red];
const ENEMY_COLORS: [Color; ANIMATION_FRAMES as usize] = [
    Color::Rgb(255, 0, 0),
    Color::Rgb(200, 0, 0),
    Color::Rgb(150, 0, 0),
];
// The death animation picks one fire color per frame
const _: () = assert!(EXPLOSION_FRAMES as usize <= EXPLOSION_COLORS);
const PLAYER_EXPLOSION_RADIUS: i32 = 15;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub status: GameStatus,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub explosions: &'a [Explosion],
    pub state: &'a GameState,
    /// Level number while the level-start banner is up
    pub level_banner: Option<u32>,
    pub area: Rect,
    pub fps: u32,
}

impl<'a> RenderView<'a> {
    pub fn new(session: &'a GameSession, area: Rect) -> Self {
        Self {
            status: session.status,
            player: &session.player,
            bullets: &session.bullets,
            enemies: &session.enemies,
            explosions: &session.explosions,
            state: &session.state,
            level_banner: None,
            area,
            fps: 0,
        }
    }
}

/// Maps the 800x600 logical canvas onto a block of terminal cells
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    area: Rect,
}

impl Viewport {
    pub fn new(area: Rect) -> Self {
        Self { area }
    }

    /// Cells covered by a logical box, clipped to the viewport. Every visible
    /// box covers at least one cell.
    pub fn cell_rect(&self, hitbox: &Hitbox) -> Option<Rect> {
        let width = i32::from(self.area.width);
        let height = i32::from(self.area.height);
        if width == 0 || height == 0 {
            return None;
        }

        let x0 = scale_floor(hitbox.left(), width, SCREEN_WIDTH);
        let x1 = scale_ceil(hitbox.right(), width, SCREEN_WIDTH).max(x0 + 1);
        let y0 = scale_floor(hitbox.top(), height, SCREEN_HEIGHT);
        let y1 = scale_ceil(hitbox.bottom(), height, SCREEN_HEIGHT).max(y0 + 1);

        let (x0, x1) = (x0.max(0), x1.min(width));
        let (y0, y1) = (y0.max(0), y1.min(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some(Rect {
            x: self.area.x + x0 as u16,
            y: self.area.y + y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }

    /// Cell containing a logical point
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        self.cell_rect(&Hitbox::new(x, y, 1, 1))
            .map(|rect| (rect.x, rect.y))
    }

    /// Logical coordinates of the center of an absolute cell position
    pub fn cell_center(&self, col: u16, row: u16) -> (f64, f64) {
        let col = f64::from(col.saturating_sub(self.area.x)) + 0.5;
        let row = f64::from(row.saturating_sub(self.area.y)) + 0.5;
        (
            col * f64::from(SCREEN_WIDTH) / f64::from(self.area.width.max(1)),
            row * f64::from(SCREEN_HEIGHT) / f64::from(self.area.height.max(1)),
        )
    }
}

fn scale_floor(value: i32, cells: i32, logical: i32) -> i32 {
    (i64::from(value) * i64::from(cells)).div_euclid(i64::from(logical)) as i32
}

fn scale_ceil(value: i32, cells: i32, logical: i32) -> i32 {
    (i64::from(value) * i64::from(cells) + i64::from(logical) - 1).div_euclid(i64::from(logical))
        as i32
}

fn fill(buffer: &mut Buffer, rect: Rect, symbol: &str, style: Style) {
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            buffer.set_string(x, y, symbol, style);
        }
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    /// Creates a new GameRenderer
    pub fn new() -> Self {
        Self {}
    }

    /// Draws the playfield, HUD and any overlay for the current state
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        let hud_area = Rect {
            height: area.height.min(1),
            ..area
        };
        let controls_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: area.height.min(1),
            ..area
        };
        let field_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(2),
            ..area
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(field_area);
        frame.render_widget(block, field_area);

        let viewport = Viewport::new(inner);
        self.render_field(frame.buffer_mut(), &viewport, view);

        self.render_hud(frame, hud_area, view);
        self.render_controls(frame, controls_area, view.status);

        if let Some(level) = view.level_banner {
            self.render_level_banner(frame, inner, level);
        }
        if view.status == GameStatus::GameOver {
            self.render_game_over(frame, inner, view);
        }
    }

    fn render_field(&self, buffer: &mut Buffer, viewport: &Viewport, view: &RenderView) {
        // Static star field
        let area = viewport.area;
        for row in area.top()..area.bottom() {
            for col in area.left()..area.right() {
                if (u32::from(col) * 31 + u32::from(row) * 17) % 23 == 0 {
                    buffer.set_string(col, row, ".", Style::default().fg(Color::DarkGray));
                }
            }
        }

        for enemy in view.enemies {
            self.render_enemy(buffer, viewport, enemy);
        }

        let bullet_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        for bullet in view.bullets {
            if let Some(rect) = viewport.cell_rect(&bullet.hitbox()) {
                fill(buffer, rect, "|", bullet_style);
            }
        }

        self.render_player(buffer, viewport, view.player);

        for explosion in view.explosions {
            let color = FIRE_COLORS[explosion.color_index % FIRE_COLORS.len()];
            draw_circle(
                buffer,
                viewport,
                (explosion.x, explosion.y),
                explosion.radius,
                "▒",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }
    }

    fn render_player(&self, buffer: &mut Buffer, viewport: &Viewport, player: &Player) {
        if player.exploding {
            // One-shot animation; nothing left to draw once it has played
            if player.explosion_index < EXPLOSION_FRAMES {
                let color = FIRE_COLORS[usize::from(player.explosion_index) % FIRE_COLORS.len()];
                draw_circle(
                    buffer,
                    viewport,
                    player.center(),
                    PLAYER_EXPLOSION_RADIUS,
                    "█",
                    Style::default().fg(color),
                );
            }
            return;
        }

        let style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        if let Some(rect) = viewport.cell_rect(&player.hitbox()) {
            fill(buffer, rect, "█", style);
        }
        // Nose, 10px above the hull
        let (nose_x, _) = player.center();
        if let Some((col, row)) = viewport.cell_at(nose_x, player.y - 10) {
            buffer.set_string(col, row, "▲", style);
        }
    }

    fn render_enemy(&self, buffer: &mut Buffer, viewport: &Viewport, enemy: &Enemy) {
        let color = ENEMY_COLORS[usize::from(enemy.current_frame) % ENEMY_COLORS.len()];
        let Some(rect) = viewport.cell_rect(&enemy.hitbox()) else {
            return;
        };
        fill(buffer, rect, "█", Style::default().fg(color));

        let eye_style = Style::default().fg(Color::Black).bg(color);
        for eye_x in [enemy.x + 10, enemy.x + Enemy::WIDTH - 10] {
            if let Some((col, row)) = viewport.cell_at(eye_x, enemy.y + 15) {
                buffer.set_string(col, row, "●", eye_style);
            }
        }
    }

    fn render_hud(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let label = Style::default().fg(Color::DarkGray);
        let stats = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                format!("{}", view.state.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  High Score: ", label),
            Span::styled(
                format!("{}", view.state.high_score),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Level: ", label),
            Span::styled(
                format!("{}", view.state.level),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enemies: ", label),
            Span::styled(
                format!("{}", view.enemies.len()),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", label),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };
        frame.render_widget(Paragraph::new(stats), stats_area);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect, status: GameStatus) {
        let hint = match status {
            GameStatus::Playing => "[←/→ or A/D: Move] [Space: Fire] [Q: Quit]",
            GameStatus::GameOver => "[R: Restart] [Q: Quit]",
        };
        let controls = Line::from(vec![Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(controls).centered(), area);
    }

    fn render_level_banner(&self, frame: &mut Frame, area: Rect, level: u32) {
        let banner_text = vec![
            Line::from(""),
            Line::from(format!("LEVEL {}", level))
                .centered()
                .bold()
                .yellow(),
            Line::from(""),
            Line::from("Get ready!").centered().white(),
        ];

        let banner_area = centered(area, 30, 6);
        frame.render_widget(Clear, banner_area);
        frame.render_widget(
            Paragraph::new(banner_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            banner_area,
        );
    }

    /// Overlay drawn on top of the frozen playfield
    fn render_game_over(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let state = view.state;
        let mut game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║        GAME OVER!         ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Final Score: {}", state.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("High Score: {}", state.high_score))
                .centered()
                .magenta()
                .bold(),
        ];
        if state.score > 0 && state.score == state.high_score {
            game_over_text.push(Line::from("New high score!").centered().cyan().bold());
        }
        game_over_text.extend([
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ]);

        let height = game_over_text.len() as u16 + 2;
        let overlay_area = centered(area, 40, height);
        frame.render_widget(Clear, overlay_area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            overlay_area,
        );
    }
}

/// Fills every cell whose center lies within `radius` logical pixels
fn draw_circle(
    buffer: &mut Buffer,
    viewport: &Viewport,
    (cx, cy): (i32, i32),
    radius: i32,
    symbol: &str,
    style: Style,
) {
    if radius <= 0 {
        return;
    }
    let bounds = Hitbox::new(cx - radius, cy - radius, radius * 2, radius * 2);
    if let Some(rect) = viewport.cell_rect(&bounds) {
        let r = f64::from(radius);
        for row in rect.top()..rect.bottom() {
            for col in rect.left()..rect.right() {
                let (x, y) = viewport.cell_center(col, row);
                let (dx, dy) = (x - f64::from(cx), y - f64::from(cy));
                if dx * dx + dy * dy <= r * r {
                    buffer.set_string(col, row, symbol, style);
                }
            }
        }
    }
    // Small explosions still show up on coarse terminals
    if let Some((col, row)) = viewport.cell_at(cx, cy) {
        buffer.set_string(col, row, symbol, style);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
