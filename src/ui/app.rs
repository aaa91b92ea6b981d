//! Main UI Application
//!
//! Coordinates rendering and input handling across all screens.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::widgets::{centered_rect, message_lines, pool_bar};
use crate::combat::{Action, BattlePhase};
use crate::ecs::{Position, Townsfolk};
use crate::game::{Game, GameState, Input, Modal, Snapshot, MENU_BACK};
use crate::navigation::shop;
use crate::progression::exp_threshold;
use crate::world::{DungeonTile, Grid, OverworldTile, Region, TileKind, TownTile};

const BAR_WIDTH: usize = 20;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    Type(char),
    Backspace,
    SaveMenu,
    LoadMenu,
    Info,
    /// Erase the slot highlighted in the load menu
    DeleteSave,
    Travel(Region),
    /// Close a dialog or leave name entry
    Back,
    ReturnToTitle,
    Quit,
}

/// Normalize a key press for the current state
pub fn command_for(key: KeyEvent, state: GameState) -> Option<Command> {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    if state == GameState::NameInput {
        return match key.code {
            KeyCode::Enter => Some(Command::Input(Input::Confirm)),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Esc => Some(Command::Back),
            KeyCode::Char(c) => Some(Command::Type(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') => Some(Command::Input(Input::Up)),
        KeyCode::Down | KeyCode::Char('s') => Some(Command::Input(Input::Down)),
        KeyCode::Left | KeyCode::Char('a') => Some(Command::Input(Input::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::Input(Input::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Input(Input::Confirm)),
        KeyCode::F(2) | KeyCode::Char('S') => Some(Command::SaveMenu),
        KeyCode::F(3) | KeyCode::Char('L') => Some(Command::LoadMenu),
        KeyCode::Char('i') => Some(Command::Info),
        KeyCode::Delete | KeyCode::Char('x') => Some(Command::DeleteSave),
        KeyCode::Char('1') => Some(Command::Travel(Region::Avonlea)),
        KeyCode::Char('2') => Some(Command::Travel(Region::Cavendish)),
        KeyCode::Char('3') => Some(Command::Travel(Region::Charlottetown)),
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Char('q') if state == GameState::Title => Some(Command::Quit),
        KeyCode::Char('q') => Some(Command::ReturnToTitle),
        _ => None,
    }
}

/// Main UI application
#[derive(Debug)]
pub struct App {
    /// Show the key reference under the log
    show_keys: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self { show_keys: true }
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        if key.code == KeyCode::Char('?') {
            self.show_keys = !self.show_keys;
            return Ok(false);
        }

        let Some(command) = command_for(key, game.state()) else {
            return Ok(false);
        };
        log::debug!("Key {:?} -> {:?}", key.code, command);

        match command {
            Command::Quit => return Ok(true),
            Command::Input(input) => game.dispatch(input),
            Command::Type(c) => game.type_char(c),
            Command::Backspace => game.backspace(),
            Command::SaveMenu => {
                game.open_save_menu();
            }
            Command::LoadMenu => {
                game.open_load_menu();
            }
            Command::Info => {
                game.open_info();
            }
            Command::DeleteSave => {
                game.delete_selected_save();
            }
            Command::Travel(region) => {
                game.travel_to(region);
            }
            Command::Back => {
                if game.modal().is_some() {
                    game.close_modal();
                } else if game.state() == GameState::NameInput {
                    game.return_to_title();
                }
            }
            Command::ReturnToTitle => {
                if game.modal().is_none() && !game.is_loading() {
                    game.return_to_title();
                }
            }
        }
        Ok(false)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, frame: &mut Frame, game: &Game) {
        frame.render_widget(Clear, frame.area());
        let snap = game.snapshot();

        match snap.state {
            GameState::Title => self.render_title(frame),
            GameState::NameInput => self.render_name_input(frame, &snap),
            GameState::Overworld | GameState::Town | GameState::Dungeon => self.render_exploring(frame, &snap),
            GameState::Combat | GameState::Victory | GameState::Defeat => self.render_battle(frame, &snap),
        }

        match snap.modal {
            Some(Modal::SaveMenu { selected }) => self.render_slots(frame, game, " SAVE GAME ", *selected, true),
            Some(Modal::LoadMenu { selected }) => self.render_slots(frame, game, " LOAD GAME ", *selected, false),
            Some(Modal::PrestigeConfirm) => self.render_prestige(frame, &snap),
            Some(Modal::Info { text }) => self.render_info(frame, text),
            None => {}
        }
    }

    fn render_title(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(area);

        let title = vec![
            Line::from(Span::styled(
                r" _____          _                ___                  _   ",
                Style::default().fg(Color::Rgb(200, 120, 40)),
            )),
            Line::from(Span::styled(
                r"|_   _|  _ _ _| |_____ _  _     / _ \ _  _ ___ ___| |_ ",
                Style::default().fg(Color::Rgb(190, 110, 40)),
            )),
            Line::from(Span::styled(
                r"  | || || | '_| / / -_) || |   | (_) | || / -_|_-<|  _|",
                Style::default().fg(Color::Rgb(170, 95, 35)),
            )),
            Line::from(Span::styled(
                r"  |_| \_,_|_| |_\_\___|\_, |    \__\_\\_,_\___/__/ \__|",
                Style::default().fg(Color::Rgb(150, 80, 30)),
            )),
            Line::from(Span::styled(
                r"                       |__/                             ",
                Style::default().fg(Color::Rgb(130, 70, 25)),
            )),
        ];
        frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

        let menu = vec![
            Line::from(Span::styled(
                "[Enter] New Game",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("[L] Load Game", Style::default().fg(Color::White))),
            Line::from(""),
            Line::from(Span::styled("[Q] Quit", Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(menu).alignment(Alignment::Center), chunks[1]);

        let version = Paragraph::new(format!("v{}", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(version, chunks[2]);
    }

    fn render_name_input(&self, frame: &mut Frame, snap: &Snapshot<'_>) {
        let area = centered_rect(50, 30, frame.area());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" What is your name? ")
            .border_style(Style::default().fg(Color::Yellow));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", snap.name_buffer),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Begin  [Esc] Back",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
    }

    fn render_exploring(&self, frame: &mut Frame, snap: &Snapshot<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(9)])
            .split(frame.area());
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(36)])
            .split(rows[0]);

        self.render_map(frame, snap, top[0]);
        self.render_sidebar(frame, snap, top[1]);
        self.render_messages(frame, snap, rows[1]);

        if let (GameState::Town, Some(menu)) = (snap.state, snap.explorer.shop) {
            let area = centered_rect(50, 40, frame.area());
            frame.render_widget(Clear, area);
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", menu.kind.name()))
                .border_style(Style::default().fg(Color::Yellow));
            let price = shop::cost(menu.kind, snap.player.level);
            let choices = [format!("{} - {} gold", shop::offer(menu.kind), price), "Leave".to_string()];
            let mut lines = vec![Line::from("")];
            for (i, choice) in choices.into_iter().enumerate() {
                let selected = i == menu.selected;
                let style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(Span::styled(
                    format!("{}{}", if selected { "> " } else { "  " }, choice),
                    style,
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("You have {} gold", snap.player.gold),
                Style::default().fg(Color::Gray),
            )));
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
        }
    }

    fn render_map(&self, frame: &mut Frame, snap: &Snapshot<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", snap.location_label))
            .border_style(Style::default().fg(Color::DarkGray));

        let explorer = snap.explorer;
        let lines = match snap.state {
            GameState::Town => {
                let folk: Vec<Position> = explorer
                    .townsfolk
                    .query::<(&Position, &Townsfolk)>()
                    .iter()
                    .map(|(_, (p, _))| *p)
                    .collect();
                grid_lines(&snap.maps.town, explorer.town_pos, &folk, town_color)
            }
            GameState::Dungeon => grid_lines(
                snap.maps.dungeon(explorer.dungeon_floor),
                explorer.dungeon_pos,
                &[],
                dungeon_color,
            ),
            _ => grid_lines(
                snap.maps.overworld(explorer.region),
                explorer.overworld_pos,
                &[],
                |t: OverworldTile| {
                    let (r, g, b) = t.fg_color();
                    Color::Rgb(r, g, b)
                },
            ),
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_sidebar(&self, frame: &mut Frame, snap: &Snapshot<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::DarkGray));
        let p = snap.player;

        let mut lines = vec![
            Line::from(Span::styled(
                p.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Level {}  EXP {}/{}", p.level, p.exp, exp_threshold(p.level))),
            pool_bar("HP", &p.hp, BAR_WIDTH, Color::Red),
            pool_bar("MP", &p.mp, BAR_WIDTH, Color::Blue),
            Line::from(format!("ATK +{}  DEF +{}", p.equipment_atk, p.equipment_def)),
            Line::from(format!("Gold {}  Potions {}", p.gold, p.potions)),
        ];
        if p.prestige > 0 {
            lines.push(Line::from(Span::styled(
                format!("Prestige {}", p.prestige),
                Style::default().fg(Color::Magenta),
            )));
        }
        lines.push(Line::from(""));
        for region in Region::ALL {
            let progress = snap.progress.region(region);
            let marks = format!(
                "{} B1{} B2{}",
                region.name(),
                if progress.floor1_cleared { "✓" } else { "·" },
                if progress.floor2_cleared { "✓" } else { "·" },
            );
            let color = if snap.progress.is_unlocked(region) { Color::Gray } else { Color::DarkGray };
            lines.push(Line::from(Span::styled(marks, Style::default().fg(color))));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_messages(&self, frame: &mut Frame, snap: &Snapshot<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));
        let mut lines = message_lines(snap.log);
        if self.show_keys {
            lines.push(Line::from(Span::styled(
                "Move WASD/arrows  Act Enter  S save  L load  i info  1-3 travel  q title  ? keys",
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
    }

    fn render_battle(&self, frame: &mut Frame, snap: &Snapshot<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(9)])
            .split(frame.area());
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        let enemy_block = Block::default()
            .borders(Borders::ALL)
            .title(" Enemy ")
            .border_style(Style::default().fg(Color::Red));

        match snap.battle {
            None => {
                let waiting = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Something stirs in the shadows...",
                        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                    )),
                ])
                .alignment(Alignment::Center)
                .block(enemy_block);
                frame.render_widget(waiting, top[0]);
            }
            Some(battle) => {
                let enemy = &battle.enemy;
                let name_style = if enemy.is_boss {
                    Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                };
                let mut lines = vec![
                    Line::from(Span::styled(format!("{} (Lv.{})", enemy.name, enemy.level), name_style)),
                    pool_bar("HP", &enemy.hp, BAR_WIDTH, Color::Red),
                    pool_bar("MP", &enemy.mp, BAR_WIDTH, Color::Blue),
                    Line::from(format!("ATK {}  DEF {}", enemy.attack, enemy.defense)),
                    Line::from(""),
                ];
                if !enemy.description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        enemy.description.clone(),
                        Style::default().fg(Color::Gray),
                    )));
                }
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(enemy_block), top[0]);

                let menu_block = Block::default()
                    .borders(Borders::ALL)
                    .title(" Command ")
                    .border_style(Style::default().fg(Color::DarkGray));
                let mut menu: Vec<Line> = Vec::new();
                match battle.phase() {
                    BattlePhase::Victory => menu.push(Line::from(Span::styled(
                        "Victory! [Enter] Continue",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))),
                    BattlePhase::Defeat => menu.push(Line::from(Span::styled(
                        "You have fallen. [Enter] Wake up in town",
                        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
                    ))),
                    _ => {
                        for (i, action) in Action::MENU.iter().enumerate() {
                            let selected = i == battle.selected_index();
                            let style = if selected {
                                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                            } else {
                                Style::default().fg(Color::White)
                            };
                            menu.push(Line::from(Span::styled(
                                format!("{}{}", if selected { "> " } else { "  " }, action.label()),
                                style,
                            )));
                        }
                    }
                }
                menu.push(Line::from(""));
                menu.push(pool_bar("HP", &snap.player.hp, BAR_WIDTH, Color::Red));
                menu.push(pool_bar("MP", &snap.player.mp, BAR_WIDTH, Color::Blue));
                menu.push(Line::from(format!("Potions {}", snap.player.potions)));
                frame.render_widget(Paragraph::new(menu).block(menu_block), top[1]);
            }
        }

        self.render_messages(frame, snap, rows[1]);
    }

    fn render_slots(&self, frame: &mut Frame, game: &Game, title: &str, selected: usize, saving: bool) {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::Yellow));

        let mut lines = vec![Line::from("")];
        for (slot, summary) in game.slot_summaries() {
            let index = usize::from(slot) - 1;
            let is_selected = index == selected;
            let auto = slot == crate::save::AUTO_SAVE_SLOT;
            let prefix = if is_selected { "> " } else { "  " };
            let name = if auto { "AUTO".to_string() } else { format!("SLOT {}", slot) };
            let text = match summary {
                Some(s) => format!(
                    "{}{}: {} Lv.{} {} ({})",
                    prefix,
                    name,
                    s.name,
                    s.level,
                    s.label,
                    s.timestamp.format("%Y-%m-%d %H:%M")
                ),
                None => format!("{}{}: Empty", prefix, name),
            };
            let mut style = if is_selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            if auto && saving {
                style = style.fg(Color::DarkGray);
            }
            lines.push(Line::from(Span::styled(text, style)));
        }
        lines.push(Line::from(""));
        let back_style = if selected == MENU_BACK {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{}Back", if selected == MENU_BACK { "> " } else { "  " }),
            back_style,
        )));
        if !saving {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[Enter] Load  [X] Erase  [Esc] Close",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_prestige(&self, frame: &mut Frame, snap: &Snapshot<'_>) {
        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Reincarnation ")
            .border_style(Style::default().fg(Color::Magenta));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "The last guardian has fallen.",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "Be reborn at prestige {} with +10 ATK and +10 DEF.",
                snap.player.prestige + 1
            )),
            Line::from("Your level, gold and potions stay with you."),
            Line::from(""),
            Line::from(Span::styled("[Enter] Reincarnate", Style::default().fg(Color::Magenta))),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
    }

    fn render_info(&self, frame: &mut Frame, text: &str) {
        let area = centered_rect(50, 50, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::Cyan));
        let mut lines: Vec<Line> = text.lines().map(|l| Line::from(l.to_string())).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[Enter] Close", Style::default().fg(Color::DarkGray))));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn town_color(tile: TownTile) -> Color {
    match tile {
        TownTile::Tree => Color::Rgb(30, 110, 40),
        TownTile::House => Color::Rgb(170, 110, 70),
        TownTile::Road => Color::Rgb(120, 120, 120),
        TownTile::Shop(_) => Color::Rgb(230, 200, 60),
        TownTile::Exit => Color::Rgb(220, 60, 40),
    }
}

fn dungeon_color(tile: DungeonTile) -> Color {
    match tile {
        DungeonTile::Wall => Color::Rgb(80, 70, 90),
        DungeonTile::Floor => Color::Rgb(110, 100, 90),
        DungeonTile::Boss => Color::Rgb(230, 40, 40),
        DungeonTile::Stairs => Color::Rgb(230, 200, 60),
        DungeonTile::Entrance => Color::Rgb(120, 200, 120),
    }
}

/// One line per grid row, with the hero and any townsfolk drawn on top
fn grid_lines<T: TileKind>(
    grid: &Grid<T>,
    hero: Position,
    others: &[Position],
    color: impl Fn(T) -> Color,
) -> Vec<Line<'static>> {
    grid.rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, tile)| {
                    let pos = Position::new(x as i32, y as i32);
                    if pos == hero {
                        Span::styled(
                            "@ ",
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        )
                    } else if others.contains(&pos) {
                        Span::styled("☺ ", Style::default().fg(Color::LightCyan))
                    } else {
                        Span::styled(format!("{} ", tile.glyph()), Style::default().fg(color(*tile)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
