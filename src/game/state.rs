//! Game state machine
//!
//! `Game` owns the whole session: the hero, region progress, navigator
//! context, the current battle and the message log. Every input passes
//! through `dispatch`, which routes it to a modal, the active navigator, or
//! the battle. Enemy generation runs behind a `Generator`; while a request
//! is outstanding all input is dropped.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::input::Input;
use super::messages::{LogEntry, MessageLog};
use super::time::{Scheduler, TaskKind, TaskOwner};
use crate::combat::{Battle, BattleSite, TurnOutcome};
use crate::data::{fallback_enemy, EnemyContent, GameConfig, GenerationRequest, Generator, Language, ThreadedGenerator};
use crate::entities::{name_width, spawn_townsfolk, Enemy, Player};
use crate::entities::player::NAME_WIDTH;
use crate::navigation::{dungeon, overworld, town, Explorer, Location, NavOutcome};
use crate::progression::{
    apply_defeat_penalty, apply_prestige, exp_threshold, level_title, target_level, BossClear,
    EncounterContext, WorldProgress,
};
use crate::save::{self, delete_save, list_saves, load_game, save_game, FileStore, SaveError, SaveRecord, SaveSummary, SlotStore, SLOT_COUNT};
use crate::world::{Region, WorldMaps};

/// Index of the "Back" entry in the save and load menus
pub const MENU_BACK: usize = SLOT_COUNT as usize;

/// All top-level game states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Title screen
    Title,
    /// Typing the hero's name
    NameInput,
    Overworld,
    Town,
    Dungeon,
    /// Turn-based combat, including while the enemy is being generated
    Combat,
    /// Enemy defeated; waiting for acknowledgement
    Victory,
    /// Hero defeated; waiting for acknowledgement
    Defeat,
}

impl GameState {
    /// One of the three navigator states
    pub fn is_exploring(&self) -> bool {
        matches!(self, GameState::Overworld | GameState::Town | GameState::Dungeon)
    }

    pub fn is_battle(&self) -> bool {
        matches!(self, GameState::Combat | GameState::Victory | GameState::Defeat)
    }
}

/// Dialogs drawn over the current state. While one is open it receives all input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Entries 0..4 are slots 1..5, `MENU_BACK` closes
    SaveMenu { selected: usize },
    LoadMenu { selected: usize },
    /// The final guardian fell; Confirm reincarnates
    PrestigeConfirm,
    Info { text: String },
}

fn cycle_menu(selected: usize, forward: bool) -> usize {
    let len = MENU_BACK + 1;
    if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}

/// An enemy request that has not been answered yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEncounter {
    token: u64,
    level: u32,
    is_boss: bool,
    site: BattleSite,
    requested_at: Duration,
}

/// Read-only view of the session for the presentation layer
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub modal: Option<&'a Modal>,
    pub player: &'a Player,
    pub progress: &'a WorldProgress,
    pub explorer: &'a Explorer,
    pub maps: &'a WorldMaps,
    pub battle: Option<&'a Battle>,
    pub log: &'a MessageLog,
    pub loading: bool,
    pub name_buffer: &'a str,
    pub location_label: String,
}

/// The main game struct that holds all session data
pub struct Game {
    state: GameState,
    /// Where to return after combat
    previous_state: GameState,
    modal: Option<Modal>,
    player: Player,
    progress: WorldProgress,
    explorer: Explorer,
    maps: WorldMaps,
    battle: Option<Battle>,
    log: MessageLog,
    rng: StdRng,
    scheduler: Scheduler,
    /// Owner the scheduler's tasks are currently bound to
    timers_owner: Option<TaskOwner>,
    pending: Option<PendingEncounter>,
    /// Session as it stood when the current fight was requested
    combat_entry: Option<SaveRecord>,
    next_token: u64,
    /// Session time accumulated through `update`
    clock: Duration,
    name_buffer: String,
    language: Language,
    passive_tick: Duration,
    npc_wander: Duration,
    provider_timeout: Duration,
    store: Box<dyn SlotStore>,
    generator: Box<dyn Generator>,
}

impl Game {
    /// Create a new game instance
    pub fn new(config: &GameConfig, store: Box<dyn SlotStore>, generator: Box<dyn Generator>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: GameState::Title,
            previous_state: GameState::Overworld,
            modal: None,
            player: Player::default(),
            progress: WorldProgress::new(),
            explorer: Explorer::new(),
            maps: WorldMaps::new(),
            battle: None,
            log: MessageLog::new(),
            rng,
            scheduler: Scheduler::new(),
            timers_owner: None,
            pending: None,
            combat_entry: None,
            next_token: 0,
            clock: Duration::ZERO,
            name_buffer: String::new(),
            language: config.language,
            passive_tick: config.passive_tick(),
            npc_wander: config.npc_wander(),
            provider_timeout: config.provider_timeout(),
            store,
            generator,
        }
    }

    /// File-backed slots and a threaded generator using the configured provider
    pub fn from_config(config: &GameConfig) -> Self {
        let store = FileStore::new(config.save_directory());
        log::info!("Save directory: {}", store.directory().display());
        let generator = ThreadedGenerator::new(config.build_provider());
        Self::new(config, Box::new(store), Box::new(generator))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn previous_state(&self) -> GameState {
        self.previous_state
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn progress(&self) -> &WorldProgress {
        &self.progress
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn maps(&self) -> &WorldMaps {
        &self.maps
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// An enemy is being generated
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn name_buffer(&self) -> &str {
        &self.name_buffer
    }

    /// A hero exists (past name entry)
    pub fn in_session(&self) -> bool {
        !matches!(self.state, GameState::Title | GameState::NameInput)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            modal: self.modal.as_ref(),
            player: &self.player,
            progress: &self.progress,
            explorer: &self.explorer,
            maps: &self.maps,
            battle: self.battle.as_ref(),
            log: &self.log,
            loading: self.is_loading(),
            name_buffer: &self.name_buffer,
            location_label: self.location_label(),
        }
    }

    /// Summaries for every slot, for the save and load menus
    pub fn slot_summaries(&self) -> Vec<(u8, Option<SaveSummary>)> {
        list_saves(self.store.as_ref())
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            log::info!("State: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        self.sync_timers();
    }

    fn wanted_timer_owner(&self) -> Option<TaskOwner> {
        match self.state {
            GameState::Overworld => Some(TaskOwner::Overworld(self.explorer.region)),
            GameState::Town => Some(TaskOwner::Town),
            _ => None,
        }
    }

    /// Cancel the old context's tasks and bind the new context's, if the owner changed
    fn sync_timers(&mut self) {
        let wanted = self.wanted_timer_owner();
        if wanted == self.timers_owner {
            return;
        }
        if let Some(owner) = self.timers_owner.take() {
            self.scheduler.cancel_owner(owner);
        }
        match wanted {
            Some(owner @ TaskOwner::Overworld(_)) => {
                self.explorer.study_streak = 0;
                self.scheduler.bind(TaskKind::PassiveTile, owner, self.passive_tick);
            }
            Some(TaskOwner::Town) => {
                self.scheduler.bind(TaskKind::TownsfolkWander, TaskOwner::Town, self.npc_wander);
            }
            None => {}
        }
        self.timers_owner = wanted;
    }

    fn return_from_combat(&mut self) {
        self.battle = None;
        self.combat_entry = None;
        let back = self.previous_state;
        self.set_state(back);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Route one input signal
    pub fn dispatch(&mut self, input: Input) {
        if self.is_loading() {
            log::debug!("Input {:?} dropped while loading", input);
            return;
        }
        if self.modal.is_some() {
            self.dispatch_modal(input);
            return;
        }

        match self.state {
            GameState::Title => {
                if input == Input::Confirm {
                    self.name_buffer.clear();
                    self.set_state(GameState::NameInput);
                }
            }
            GameState::NameInput => {
                if input == Input::Confirm {
                    self.submit_name();
                }
            }
            GameState::Overworld => {
                let from = self.explorer.overworld_pos;
                let outcome = match input.direction() {
                    Some(dir) => overworld::step(&mut self.explorer, &self.maps, dir, &mut self.rng),
                    None => overworld::confirm(&mut self.explorer, &self.maps, &mut self.log),
                };
                // A passive tile only acts after a full period on it
                if self.explorer.overworld_pos != from {
                    self.scheduler.restart(TaskKind::PassiveTile);
                }
                self.follow(outcome);
            }
            GameState::Town => {
                let outcome = match input.direction() {
                    Some(dir) => town::step(&mut self.explorer, &self.maps, dir),
                    None => town::confirm(&mut self.explorer, &self.maps, &mut self.player, &mut self.log),
                };
                self.follow(outcome);
            }
            GameState::Dungeon => {
                let outcome = match input.direction() {
                    Some(dir) => dungeon::step(&mut self.explorer, &self.maps, dir, &mut self.rng),
                    None => dungeon::confirm(&mut self.explorer, &self.maps, &self.progress, &mut self.log),
                };
                self.follow(outcome);
            }
            GameState::Combat => self.dispatch_combat(input),
            GameState::Victory => {
                if input == Input::Confirm {
                    self.return_from_combat();
                }
            }
            GameState::Defeat => {
                if input == Input::Confirm {
                    self.acknowledge_defeat();
                }
            }
        }
    }

    fn follow(&mut self, outcome: NavOutcome) {
        match outcome {
            NavOutcome::Stay => {}
            NavOutcome::Encounter { boss } => self.start_encounter(boss),
            NavOutcome::Enter(Location::Town) => {
                town::enter(&mut self.explorer, &self.maps, self.player.level, &mut self.rng);
                self.set_state(GameState::Town);
            }
            NavOutcome::Enter(Location::Overworld) => self.set_state(GameState::Overworld),
            NavOutcome::Enter(Location::Dungeon) => self.set_state(GameState::Dungeon),
        }
    }

    fn dispatch_combat(&mut self, input: Input) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        let outcome = match input {
            Input::Up => {
                battle.cycle(false);
                return;
            }
            Input::Down => {
                battle.cycle(true);
                return;
            }
            Input::Left | Input::Right => return,
            Input::Confirm => battle.confirm(&mut self.player, &mut self.progress, &mut self.log, &mut self.rng),
        };

        match outcome {
            TurnOutcome::Continue => {}
            TurnOutcome::Fled => self.return_from_combat(),
            TurnOutcome::Won { boss: Some(BossClear::FinalCleared) } => {
                self.set_state(GameState::Victory);
                self.modal = Some(Modal::PrestigeConfirm);
                log::info!("Final guardian defeated; awaiting reincarnation");
            }
            TurnOutcome::Won { .. } => {
                self.set_state(GameState::Victory);
                self.auto_save();
            }
            TurnOutcome::Lost => self.set_state(GameState::Defeat),
        }
    }

    fn dispatch_modal(&mut self, input: Input) {
        let Some(modal) = self.modal.take() else {
            return;
        };

        self.modal = match modal {
            Modal::SaveMenu { selected } => match input {
                Input::Up => Some(Modal::SaveMenu { selected: cycle_menu(selected, false) }),
                Input::Down => Some(Modal::SaveMenu { selected: cycle_menu(selected, true) }),
                Input::Left => None,
                Input::Right => Some(Modal::SaveMenu { selected }),
                Input::Confirm if selected == MENU_BACK => None,
                Input::Confirm => {
                    if self.save_to_slot(selected as u8 + 1) {
                        None
                    } else {
                        Some(Modal::SaveMenu { selected })
                    }
                }
            },
            Modal::LoadMenu { selected } => match input {
                Input::Up => Some(Modal::LoadMenu { selected: cycle_menu(selected, false) }),
                Input::Down => Some(Modal::LoadMenu { selected: cycle_menu(selected, true) }),
                Input::Left => None,
                Input::Right => Some(Modal::LoadMenu { selected }),
                Input::Confirm if selected == MENU_BACK => None,
                Input::Confirm => {
                    if self.load_from_slot(selected as u8 + 1) {
                        None
                    } else {
                        Some(Modal::LoadMenu { selected })
                    }
                }
            },
            Modal::PrestigeConfirm => {
                if input == Input::Confirm {
                    self.reincarnate();
                    None
                } else {
                    Some(Modal::PrestigeConfirm)
                }
            }
            Modal::Info { text } => match input {
                Input::Confirm | Input::Left => None,
                _ => Some(Modal::Info { text }),
            },
        };
    }

    // ========================================================================
    // Name entry
    // ========================================================================

    /// Append a character to the name being typed, within the width budget
    pub fn type_char(&mut self, c: char) {
        if self.state != GameState::NameInput || c.is_control() {
            return;
        }
        let mut candidate = self.name_buffer.clone();
        candidate.push(c);
        if name_width(&candidate) <= NAME_WIDTH {
            self.name_buffer = candidate;
        }
    }

    pub fn backspace(&mut self) {
        if self.state == GameState::NameInput {
            self.name_buffer.pop();
        }
    }

    /// Start a new game with the typed name
    fn submit_name(&mut self) {
        self.player = Player::new(&self.name_buffer);
        self.progress = WorldProgress::new();
        self.explorer = Explorer::new();
        self.battle = None;
        self.combat_entry = None;
        self.previous_state = GameState::Overworld;
        self.log.clear();
        self.log.push(LogEntry::Welcome { name: self.player.name.clone() });
        log::info!("New game for {}", self.player.name);
        self.set_state(GameState::Overworld);
    }

    // ========================================================================
    // Encounters
    // ========================================================================

    fn start_encounter(&mut self, is_boss: bool) {
        let region = self.explorer.region;
        let (ctx, floor) = if self.state == GameState::Dungeon {
            let floor = self.explorer.dungeon_floor;
            (EncounterContext::Dungeon { region, floor }, Some(floor))
        } else {
            (EncounterContext::Overworld { region, position: self.explorer.overworld_pos }, None)
        };
        let level = target_level(is_boss, ctx, &self.maps, &mut self.rng);

        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(PendingEncounter {
            token,
            level,
            is_boss,
            site: BattleSite { region, floor },
            requested_at: self.clock,
        });

        self.combat_entry = Some(self.snapshot_record());
        self.previous_state = self.state;
        self.set_state(GameState::Combat);
        self.log.push(LogEntry::Generating);
        log::info!("Encounter requested: token {}, level {}, boss {}", token, level, is_boss);
        self.generator.submit(GenerationRequest { token, level, language: self.language });
    }

    fn begin_battle(&mut self, pending: PendingEncounter, content: EnemyContent) {
        let enemy = Enemy::from_content(content, pending.level, pending.is_boss);
        log::info!("Battle started against {} (level {})", enemy.name, enemy.level);
        self.log.push(LogEntry::EnemyAppears { name: enemy.name.clone(), level: enemy.level });
        self.battle = Some(Battle::new(enemy, pending.site));
    }

    /// Apply the response matching the outstanding request; discard anything else
    fn poll_generator(&mut self) {
        while let Some(response) = self.generator.poll() {
            match self.pending {
                Some(pending) if pending.token == response.token && self.state == GameState::Combat => {
                    self.pending = None;
                    self.begin_battle(pending, response.content);
                }
                _ => log::debug!("Discarding stale enemy response (token {})", response.token),
            }
        }
    }

    fn check_generation_timeout(&mut self) {
        let Some(pending) = self.pending else {
            return;
        };
        if self.clock.saturating_sub(pending.requested_at) >= self.provider_timeout {
            log::warn!(
                "Enemy generation timed out after {:?} (token {}), using fallback",
                self.provider_timeout,
                pending.token
            );
            self.pending = None;
            let content = fallback_enemy(pending.level, self.language);
            self.begin_battle(pending, content);
        }
    }

    /// Advance timers and collect generation results
    pub fn update(&mut self, delta: Duration) {
        self.clock += delta;
        self.poll_generator();
        self.check_generation_timeout();

        if self.modal.is_some() {
            return;
        }
        for task in self.scheduler.tick(delta) {
            match task {
                TaskKind::PassiveTile if self.state == GameState::Overworld => {
                    overworld::passive_tick(&mut self.explorer, &self.maps, &mut self.player, &mut self.log);
                }
                TaskKind::TownsfolkWander if self.state == GameState::Town => {
                    town::wander_tick(&mut self.explorer, &self.maps, &mut self.rng);
                }
                _ => {}
            }
        }
    }

    // ========================================================================
    // Battle aftermath
    // ========================================================================

    fn acknowledge_defeat(&mut self) {
        self.battle = None;
        self.combat_entry = None;
        self.player.restore_full();
        let exp_lost = apply_defeat_penalty(&mut self.player);
        self.log.push(LogEntry::Recovered { exp_lost });
        self.explorer.leave_context();
        town::enter(&mut self.explorer, &self.maps, self.player.level, &mut self.rng);
        self.set_state(GameState::Town);
    }

    fn reincarnate(&mut self) {
        self.modal = None;
        self.battle = None;
        self.combat_entry = None;
        apply_prestige(&mut self.player, &mut self.progress);
        self.explorer.reset_to_start();
        self.log.push(LogEntry::Reincarnated { rank: self.player.prestige });
        self.previous_state = GameState::Overworld;
        self.set_state(GameState::Overworld);
        self.auto_save();
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn accepts_command(&self) -> bool {
        !self.is_loading() && self.modal.is_none()
    }

    pub fn open_save_menu(&mut self) -> bool {
        if !self.accepts_command() || !self.state.is_exploring() {
            return false;
        }
        self.modal = Some(Modal::SaveMenu { selected: 0 });
        true
    }

    pub fn open_load_menu(&mut self) -> bool {
        if !self.accepts_command() || !(self.state.is_exploring() || self.state == GameState::Title) {
            return false;
        }
        self.modal = Some(Modal::LoadMenu { selected: 0 });
        true
    }

    /// Erase the slot highlighted in the load menu. The menu stays open.
    pub fn delete_selected_save(&mut self) -> bool {
        let slot = match &self.modal {
            Some(Modal::LoadMenu { selected }) if *selected != MENU_BACK => *selected as u8 + 1,
            _ => return false,
        };
        match delete_save(self.store.as_mut(), slot) {
            Ok(()) => {
                log::info!("Erased slot {}", slot);
                self.log.push(LogEntry::Deleted { slot });
                true
            }
            Err(e) => {
                log::warn!("Erasing slot {} failed: {}", slot, e);
                self.log.push(LogEntry::SaveFailed);
                false
            }
        }
    }

    /// Show the hero's status sheet
    pub fn open_info(&mut self) -> bool {
        if !self.accepts_command() || !self.state.is_exploring() {
            return false;
        }
        self.modal = Some(Modal::Info { text: self.status_text() });
        true
    }

    /// Close an open menu or info dialog. Reincarnation cannot be dismissed.
    pub fn close_modal(&mut self) {
        if self.modal != Some(Modal::PrestigeConfirm) {
            self.modal = None;
        }
    }

    /// Travel to an unlocked region from the overworld
    pub fn travel_to(&mut self, region: Region) -> bool {
        if !self.accepts_command() || self.state != GameState::Overworld {
            return false;
        }
        let moved = overworld::travel_to(&mut self.explorer, &self.progress, region, &mut self.log);
        if moved {
            self.sync_timers();
        }
        moved
    }

    /// Settle an unfinished fight, auto-save, stop every timer, forget any
    /// pending generation, and show the title.
    ///
    /// A defeat is acknowledged first and a pending reincarnation is applied,
    /// so the saved hero is always playable. A fight still in progress is
    /// abandoned and the session is saved as it stood when the fight began.
    pub fn return_to_title(&mut self) {
        match self.state {
            GameState::Title | GameState::NameInput => {}
            GameState::Defeat => {
                self.acknowledge_defeat();
                self.auto_save();
            }
            GameState::Combat => match self.combat_entry.take() {
                Some(record) => self.write_auto_save(&record),
                None => self.auto_save(),
            },
            GameState::Victory if self.modal == Some(Modal::PrestigeConfirm) => self.reincarnate(),
            _ => self.auto_save(),
        }
        self.combat_entry = None;
        self.pending = None;
        self.battle = None;
        self.modal = None;
        self.set_state(GameState::Title);
        self.scheduler.cancel_all();
        self.timers_owner = None;
        self.previous_state = GameState::Overworld;
    }

    fn status_text(&self) -> String {
        let p = &self.player;
        let regions: Vec<&str> = self.progress.unlocked_regions().iter().map(|r| r.name()).collect();
        format!(
            "{} the {} (prestige {})\nLevel {}  EXP {}/{}\nHP {}/{}  MP {}/{}\nATK +{}  DEF +{}\nGold {}  Potions {}\nRegions: {}",
            p.name,
            level_title(p.level),
            p.prestige,
            p.level,
            p.exp,
            exp_threshold(p.level),
            p.hp.current,
            p.hp.max,
            p.mp.current,
            p.mp.max,
            p.equipment_atk,
            p.equipment_def,
            p.gold,
            p.potions,
            regions.join(", "),
        )
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Navigator context the session is in, looking through combat
    pub fn current_location(&self) -> Location {
        let state = if self.state.is_battle() { self.previous_state } else { self.state };
        match state {
            GameState::Town => Location::Town,
            GameState::Dungeon => Location::Dungeon,
            _ => Location::Overworld,
        }
    }

    pub fn location_label(&self) -> String {
        let region = self.explorer.region.name();
        match self.current_location() {
            Location::Overworld => region.to_string(),
            Location::Town => format!("{} Town", region),
            Location::Dungeon => format!("{} B{}", region, self.explorer.dungeon_floor),
        }
    }

    pub fn snapshot_record(&self) -> SaveRecord {
        SaveRecord {
            version: save::SAVE_VERSION,
            player: self.player.clone(),
            region: self.explorer.region,
            overworld_pos: self.explorer.overworld_pos,
            town_pos: self.explorer.town_pos,
            dungeon_floor: self.explorer.dungeon_floor,
            dungeon_pos: self.explorer.dungeon_pos,
            progress: self.progress,
            context: self.current_location(),
            location_label: self.location_label(),
            timestamp: Utc::now(),
        }
    }

    fn auto_save(&mut self) {
        let record = self.snapshot_record();
        self.write_auto_save(&record);
    }

    fn write_auto_save(&mut self, record: &SaveRecord) {
        match save::auto_save(self.store.as_mut(), record) {
            Ok(()) => self.log.push(LogEntry::AutoSaved),
            Err(e) => {
                log::warn!("Auto-save failed: {}", e);
                self.log.push(LogEntry::SaveFailed);
            }
        }
    }

    /// Manual save. Slot 5 is refused with a message.
    pub fn save_to_slot(&mut self, slot: u8) -> bool {
        if !self.in_session() {
            return false;
        }
        let record = self.snapshot_record();
        match save_game(self.store.as_mut(), slot, &record) {
            Ok(()) => {
                self.log.push(LogEntry::Saved { slot });
                true
            }
            Err(SaveError::ReservedSlot(_)) => {
                self.log.push(LogEntry::ReservedSlot);
                false
            }
            Err(e) => {
                log::warn!("Save to slot {} failed: {}", slot, e);
                self.log.push(LogEntry::SaveFailed);
                false
            }
        }
    }

    /// Load a slot; an empty or unreadable slot only logs a message
    pub fn load_from_slot(&mut self, slot: u8) -> bool {
        let Some(record) = load_game(self.store.as_ref(), slot) else {
            self.log.push(LogEntry::EmptySlot { slot });
            return false;
        };
        self.apply_record(record);
        self.log.push(LogEntry::Loaded { slot });
        true
    }

    fn apply_record(&mut self, record: SaveRecord) {
        self.pending = None;
        self.combat_entry = None;
        self.battle = None;
        self.modal = None;
        self.player = record.player;
        self.progress = record.progress;

        let explorer = &mut self.explorer;
        explorer.leave_context();
        explorer.region = record.region;
        explorer.overworld_pos = record.overworld_pos;
        explorer.town_pos = record.town_pos;
        explorer.dungeon_floor = record.dungeon_floor;
        explorer.dungeon_pos = record.dungeon_pos;
        explorer.townsfolk.clear();

        self.previous_state = GameState::Overworld;
        let state = match record.context {
            Location::Overworld => GameState::Overworld,
            Location::Town => {
                spawn_townsfolk(
                    &mut self.explorer.townsfolk,
                    &self.maps.town,
                    self.explorer.town_pos,
                    self.player.level,
                    &mut self.rng,
                );
                GameState::Town
            }
            Location::Dungeon => GameState::Dungeon,
        };
        self.set_state(state);
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("previous_state", &self.previous_state)
            .field("modal", &self.modal)
            .field("player", &self.player.name)
            .field("region", &self.explorer.region)
            .field("loading", &self.is_loading())
            .finish()
    }
}
