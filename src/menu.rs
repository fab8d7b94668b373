//! Main menu system with settings configuration

use crate::mode::ArcadeMode;
use crate::settings::Settings;

/// Menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    ModeSelect,
    Leaderboards,
    Settings,
    SettingsKeys,
    SettingsVisual,
    SettingsGameplay,
    SettingsLeaderboard,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    pub items: Vec<MenuItem>,
    /// For key rebinding: which action is waiting for input
    pub rebinding: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Toggle boolean setting
    Toggle { key: SettingKey, value: bool },
    /// Cycle through options
    Cycle { key: SettingKey, options: Vec<String>, current: usize },
    /// Numeric value with increment/decrement
    Number { key: SettingKey, value: u64, min: u64, max: u64, step: u64 },
    /// Key binding (shows current keys, can rebind)
    KeyBind { action: String, keys: Vec<String> },
    /// Free text written straight into a setting
    TextInput { key: SettingKey, value: String, placeholder: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    StartGame(ArcadeMode),
    ShowLeaderboard(ArcadeMode),
    GoToScreen(MenuScreen),
    Back,
    Quit,
    SaveSettings,
}

/// Setting keys for identifying which setting to modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ShowGhost,
    BlockStyle,
    SnakeTickMs,
    HunterInitialMs,
    HunterMinMs,
    GrowthIntervalMs,
    ChaosDropMs,
    ChaosSoftDropMs,
    PlayerName,
    ApiUrl,
    FetchLimit,
}

fn button(label: &str, action: MenuAction) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::Button(action),
    }
}

fn number(label: &str, key: SettingKey, value: u64, min: u64, max: u64, step: u64) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::Number {
            key,
            value,
            min,
            max,
            step,
        },
    }
}

fn key_bind(label: &str, action: &str, keys: &[String]) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::KeyBind {
            action: action.to_string(),
            keys: keys.to_vec(),
        },
    }
}

impl Menu {
    pub fn new() -> Self {
        Self::main_menu()
    }

    fn with_items(screen: MenuScreen, items: Vec<MenuItem>) -> Self {
        Self {
            screen,
            selected: 0,
            items,
            rebinding: None,
        }
    }

    pub fn main_menu() -> Self {
        Self::with_items(
            MenuScreen::Main,
            vec![
                button("Play", MenuAction::GoToScreen(MenuScreen::ModeSelect)),
                button("Leaderboards", MenuAction::GoToScreen(MenuScreen::Leaderboards)),
                button("Settings", MenuAction::GoToScreen(MenuScreen::Settings)),
                button("Quit", MenuAction::Quit),
            ],
        )
    }

    pub fn mode_select() -> Self {
        let mut items: Vec<MenuItem> = ArcadeMode::all()
            .iter()
            .map(|&mode| button(mode.name(), MenuAction::StartGame(mode)))
            .collect();
        items.push(button("Back", MenuAction::Back));
        Self::with_items(MenuScreen::ModeSelect, items)
    }

    pub fn leaderboards_menu() -> Self {
        Self::with_items(
            MenuScreen::Leaderboards,
            vec![
                button("Snake", MenuAction::ShowLeaderboard(ArcadeMode::Snake)),
                button("Chaos Drop", MenuAction::ShowLeaderboard(ArcadeMode::ChaosDrop)),
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn settings_menu() -> Self {
        Self::with_items(
            MenuScreen::Settings,
            vec![
                button("Key Bindings", MenuAction::GoToScreen(MenuScreen::SettingsKeys)),
                button("Visual", MenuAction::GoToScreen(MenuScreen::SettingsVisual)),
                button("Gameplay", MenuAction::GoToScreen(MenuScreen::SettingsGameplay)),
                button("Leaderboard", MenuAction::GoToScreen(MenuScreen::SettingsLeaderboard)),
                button("Save", MenuAction::SaveSettings),
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn settings_keys(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self::with_items(
            MenuScreen::SettingsKeys,
            vec![
                key_bind("Left", "left", &keys.left),
                key_bind("Right", "right", &keys.right),
                key_bind("Up / Rotate", "up", &keys.up),
                key_bind("Down / Soft Drop", "down", &keys.down),
                key_bind("Hard Drop", "hard_drop", &keys.hard_drop),
                key_bind("Rotate CW", "rotate_cw", &keys.rotate_cw),
                key_bind("Rotate CCW", "rotate_ccw", &keys.rotate_ccw),
                key_bind("Restart", "restart", &keys.restart),
                key_bind("Menu", "quit", &keys.quit),
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn settings_visual(settings: &Settings) -> Self {
        let block_styles = vec!["solid".to_string(), "bracket".to_string(), "round".to_string()];
        let current_style = block_styles
            .iter()
            .position(|s| s == &settings.visual.block_style)
            .unwrap_or(0);

        Self::with_items(
            MenuScreen::SettingsVisual,
            vec![
                MenuItem {
                    label: "Ghost Piece".to_string(),
                    item_type: MenuItemType::Toggle {
                        key: SettingKey::ShowGhost,
                        value: settings.visual.show_ghost,
                    },
                },
                MenuItem {
                    label: "Block Style".to_string(),
                    item_type: MenuItemType::Cycle {
                        key: SettingKey::BlockStyle,
                        options: block_styles,
                        current: current_style,
                    },
                },
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn settings_gameplay(settings: &Settings) -> Self {
        let g = &settings.gameplay;
        Self::with_items(
            MenuScreen::SettingsGameplay,
            vec![
                number("Snake Tick (ms)", SettingKey::SnakeTickMs, g.snake_tick_ms, 60, 400, 10),
                number("Hunter Start (ms)", SettingKey::HunterInitialMs, g.hunter_initial_ms, 200, 1000, 20),
                number("Hunter Floor (ms)", SettingKey::HunterMinMs, g.hunter_min_ms, 100, 600, 10),
                number("Growth Every (ms)", SettingKey::GrowthIntervalMs, g.growth_interval_ms, 1000, 15000, 500),
                number("Chaos Gravity (ms)", SettingKey::ChaosDropMs, g.chaos_drop_ms, 100, 1500, 50),
                number("Chaos Soft Drop (ms)", SettingKey::ChaosSoftDropMs, g.chaos_soft_drop_ms, 20, 300, 10),
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn settings_leaderboard(settings: &Settings) -> Self {
        let lb = &settings.leaderboard;
        Self::with_items(
            MenuScreen::SettingsLeaderboard,
            vec![
                MenuItem {
                    label: "Player Name".to_string(),
                    item_type: MenuItemType::TextInput {
                        key: SettingKey::PlayerName,
                        value: lb.player_name.clone(),
                        placeholder: "Asked after each run".to_string(),
                    },
                },
                MenuItem {
                    label: "API URL".to_string(),
                    item_type: MenuItemType::TextInput {
                        key: SettingKey::ApiUrl,
                        value: lb.api_url.clone(),
                        placeholder: "Empty = local scores".to_string(),
                    },
                },
                number("Rows Shown", SettingKey::FetchLimit, lb.fetch_limit as u64, 1, 25, 1),
                button("Back", MenuAction::Back),
            ],
        )
    }

    /// True if the selected item takes typed text
    pub fn on_text_input(&self) -> bool {
        self.items
            .get(self.selected)
            .is_some_and(|item| matches!(item.item_type, MenuItemType::TextInput { .. }))
    }

    /// Add character to text input
    pub fn text_input_char(&mut self, c: char, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            if let MenuItemType::TextInput { key, value, .. } = &mut item.item_type {
                value.push(c);
                apply_setting(settings, key, &SettingValue::String(value.clone()));
            }
        }
    }

    /// Backspace on text input
    pub fn text_input_backspace(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            if let MenuItemType::TextInput { key, value, .. } = &mut item.item_type {
                value.pop();
                apply_setting(settings, key, &SettingValue::String(value.clone()));
            }
        }
    }

    pub fn move_up(&mut self) {
        if self.rebinding.is_some() {
            return; // Don't move while rebinding
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.rebinding.is_some() {
            return;
        }
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Handle left/right for cycling options and numbers
    pub fn adjust_left(&mut self, settings: &mut Settings) {
        self.adjust(settings, false);
    }

    pub fn adjust_right(&mut self, settings: &mut Settings) {
        self.adjust(settings, true);
    }

    fn adjust(&mut self, settings: &mut Settings, forward: bool) {
        if self.rebinding.is_some() {
            return;
        }
        let Some(item) = self.items.get_mut(self.selected) else {
            return;
        };
        match &mut item.item_type {
            MenuItemType::Toggle { key, value } => {
                *value = !*value;
                apply_setting(settings, key, &SettingValue::Bool(*value));
            }
            MenuItemType::Cycle { key, options, current } if !options.is_empty() => {
                *current = if forward {
                    (*current + 1) % options.len()
                } else if *current == 0 {
                    options.len() - 1
                } else {
                    *current - 1
                };
                apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
            }
            MenuItemType::Number { key, value, min, max, step } => {
                *value = if forward {
                    (*value + *step).min(*max)
                } else {
                    value.saturating_sub(*step).max(*min)
                };
                apply_setting(settings, key, &SettingValue::Number(*value));
            }
            _ => {}
        }
    }

    /// Get the action for the current selection (for Button types)
    pub fn select(&self) -> Option<&MenuAction> {
        if self.rebinding.is_some() {
            return None;
        }
        match self.items.get(self.selected).map(|item| &item.item_type) {
            Some(MenuItemType::Button(action)) => Some(action),
            _ => None,
        }
    }

    /// Start rebinding a key
    pub fn start_rebind(&mut self) {
        if let Some(item) = self.items.get(self.selected) {
            if matches!(item.item_type, MenuItemType::KeyBind { .. }) {
                self.rebinding = Some(self.selected);
            }
        }
    }

    /// Cancel rebinding
    pub fn cancel_rebind(&mut self) {
        self.rebinding = None;
    }

    /// Add a key to the current rebinding action (stays in rebind mode)
    pub fn add_key(&mut self, key_str: String, settings: &mut Settings) {
        if let Some(MenuItemType::KeyBind { action, keys }) = self
            .rebinding
            .and_then(|idx| self.items.get_mut(idx))
            .map(|item| &mut item.item_type)
        {
            if !keys.contains(&key_str) {
                keys.push(key_str);
                update_key_binding(settings, action, keys.clone());
            }
        }
    }

    /// Clear keys for current rebinding action and set new key
    pub fn set_key(&mut self, key_str: String, settings: &mut Settings) {
        if let Some(MenuItemType::KeyBind { action, keys }) = self
            .rebinding
            .and_then(|idx| self.items.get_mut(idx))
            .map(|item| &mut item.item_type)
        {
            *keys = vec![key_str];
            update_key_binding(settings, action, keys.clone());
        }
        self.rebinding = None;
    }

    /// Unbind every key of the selected action
    pub fn clear_keys(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            if let MenuItemType::KeyBind { action, keys } = &mut item.item_type {
                keys.clear();
                update_key_binding(settings, action, Vec::new());
            }
        }
    }

    /// Finish adding keys and exit rebind mode
    pub fn finish_rebind(&mut self) {
        self.rebinding = None;
    }

    pub fn go_to(&mut self, screen: MenuScreen, settings: &Settings) {
        *self = match screen {
            MenuScreen::Main => Self::main_menu(),
            MenuScreen::ModeSelect => Self::mode_select(),
            MenuScreen::Leaderboards => Self::leaderboards_menu(),
            MenuScreen::Settings => Self::settings_menu(),
            MenuScreen::SettingsKeys => Self::settings_keys(settings),
            MenuScreen::SettingsVisual => Self::settings_visual(settings),
            MenuScreen::SettingsGameplay => Self::settings_gameplay(settings),
            MenuScreen::SettingsLeaderboard => Self::settings_leaderboard(settings),
        };
    }

    /// Go back to previous screen
    pub fn go_back(&mut self, settings: &Settings) {
        let prev = match self.screen {
            MenuScreen::Main
            | MenuScreen::ModeSelect
            | MenuScreen::Leaderboards
            | MenuScreen::Settings => MenuScreen::Main,
            MenuScreen::SettingsKeys
            | MenuScreen::SettingsVisual
            | MenuScreen::SettingsGameplay
            | MenuScreen::SettingsLeaderboard => MenuScreen::Settings,
        };
        self.go_to(prev, settings);
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper enum for setting values
enum SettingValue {
    Bool(bool),
    String(String),
    Number(u64),
}

/// Apply a setting change to the Settings struct
fn apply_setting(settings: &mut Settings, key: &SettingKey, value: &SettingValue) {
    let gameplay = &mut settings.gameplay;
    match (key, value) {
        (SettingKey::ShowGhost, SettingValue::Bool(v)) => settings.visual.show_ghost = *v,
        (SettingKey::BlockStyle, SettingValue::String(v)) => settings.visual.block_style = v.clone(),
        (SettingKey::SnakeTickMs, SettingValue::Number(v)) => gameplay.snake_tick_ms = *v,
        (SettingKey::HunterInitialMs, SettingValue::Number(v)) => gameplay.hunter_initial_ms = *v,
        (SettingKey::HunterMinMs, SettingValue::Number(v)) => gameplay.hunter_min_ms = *v,
        (SettingKey::GrowthIntervalMs, SettingValue::Number(v)) => gameplay.growth_interval_ms = *v,
        (SettingKey::ChaosDropMs, SettingValue::Number(v)) => gameplay.chaos_drop_ms = *v,
        (SettingKey::ChaosSoftDropMs, SettingValue::Number(v)) => gameplay.chaos_soft_drop_ms = *v,
        (SettingKey::PlayerName, SettingValue::String(v)) => {
            settings.leaderboard.player_name = v.clone();
        }
        (SettingKey::ApiUrl, SettingValue::String(v)) => settings.leaderboard.api_url = v.clone(),
        (SettingKey::FetchLimit, SettingValue::Number(v)) => {
            settings.leaderboard.fetch_limit = *v as usize;
        }
        _ => {}
    }
}

/// Update a key binding in settings
fn update_key_binding(settings: &mut Settings, action: &str, keys: Vec<String>) {
    let bindings = &mut settings.keys;
    match action {
        "left" => bindings.left = keys,
        "right" => bindings.right = keys,
        "up" => bindings.up = keys,
        "down" => bindings.down = keys,
        "hard_drop" => bindings.hard_drop = keys,
        "rotate_cw" => bindings.rotate_cw = keys,
        "rotate_ccw" => bindings.rotate_ccw = keys,
        "restart" => bindings.restart = keys,
        "quit" => bindings.quit = keys,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_select_lists_every_mode() {
        let menu = Menu::mode_select();
        let starts = menu
            .items
            .iter()
            .filter(|item| matches!(item.item_type, MenuItemType::Button(MenuAction::StartGame(_))))
            .count();
        assert_eq!(starts, ArcadeMode::all().len());
    }

    #[test]
    fn test_number_adjust_clamps_and_applies() {
        let mut settings = Settings::default();
        let mut menu = Menu::settings_gameplay(&settings);
        for _ in 0..100 {
            menu.adjust_right(&mut settings);
        }
        assert_eq!(settings.gameplay.snake_tick_ms, 400);
        for _ in 0..100 {
            menu.adjust_left(&mut settings);
        }
        assert_eq!(settings.gameplay.snake_tick_ms, 60);
    }

    #[test]
    fn test_text_input_writes_setting() {
        let mut settings = Settings::default();
        let mut menu = Menu::settings_leaderboard(&settings);
        assert!(menu.on_text_input());
        for c in "ada!".chars() {
            menu.text_input_char(c, &mut settings);
        }
        menu.text_input_backspace(&mut settings);
        assert_eq!(settings.leaderboard.player_name, "ada");
    }

    #[test]
    fn test_rebind_replaces_then_adds() {
        let mut settings = Settings::default();
        let mut menu = Menu::settings_keys(&settings);
        menu.start_rebind();
        menu.set_key("h".to_string(), &mut settings);
        assert_eq!(settings.keys.left, vec!["h"]);
        assert!(menu.rebinding.is_none());

        menu.start_rebind();
        menu.add_key("j".to_string(), &mut settings);
        menu.add_key("j".to_string(), &mut settings);
        assert_eq!(settings.keys.left, vec!["h", "j"]);
    }

    #[test]
    fn test_back_navigation() {
        let settings = Settings::default();
        let mut menu = Menu::settings_visual(&settings);
        menu.go_back(&settings);
        assert_eq!(menu.screen, MenuScreen::Settings);
        menu.go_back(&settings);
        assert_eq!(menu.screen, MenuScreen::Main);
    }
}
