/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub screen: ScreenConfig,
    pub terminal: TerminalConfig,
    pub gamepad: GamepadConfig,
    pub level_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub tile_size: u32,
    pub gravity: f32,           // px/s², positive is downward
    pub jump_impulse: f32,      // px/s, negative is upward
    pub run_speed: f32,         // px/s
    pub one_way_tolerance: f32, // px below a one-way top the pre-frame bottom may be and still land
    pub one_way_blocks_rising: bool,
    pub actor_width: f32,
    pub actor_height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub scroll_margin: u32, // deadzone edge distance from each side
    pub fps: u32,
    pub max_frame_dt: f32,
}

impl ScreenConfig {
    pub fn left_boundary(&self) -> f32 {
        self.scroll_margin as f32
    }

    pub fn right_boundary(&self) -> f32 {
        self.width as f32 - self.scroll_margin as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerminalConfig {
    pub px_per_col: u32,
    pub px_per_row: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    screen: TomlScreen,
    #[serde(default)]
    terminal: TomlTerminal,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_jump_impulse")]
    jump_impulse: f32,
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_one_way_tolerance")]
    one_way_tolerance: f32,
    #[serde(default)]
    one_way_blocks_rising: bool,
    #[serde(default = "default_actor_width")]
    actor_width: f32,
    #[serde(default = "default_actor_height")]
    actor_height: f32,
}

#[derive(Deserialize, Debug)]
struct TomlScreen {
    #[serde(default = "default_screen_width")]
    width: u32,
    #[serde(default = "default_screen_height")]
    height: u32,
    #[serde(default = "default_scroll_margin")]
    scroll_margin: u32,
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_max_frame_dt")]
    max_frame_dt: f32,
}

#[derive(Deserialize, Debug)]
struct TomlTerminal {
    #[serde(default = "default_px_per_col")]
    px_per_col: u32,
    #[serde(default = "default_px_per_row")]
    px_per_row: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_restart")]
    restart: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_level")]
    level: String,
}

// ── Defaults ──

fn default_tile_size() -> u32 { 40 }
fn default_gravity() -> f32 { 1500.0 }
fn default_jump_impulse() -> f32 { -700.0 }
fn default_run_speed() -> f32 { 300.0 }
fn default_one_way_tolerance() -> f32 { 10.0 }
fn default_actor_width() -> f32 { 40.0 }
fn default_actor_height() -> f32 { 80.0 }

fn default_screen_width() -> u32 { 1600 }
fn default_screen_height() -> u32 { 900 }
fn default_scroll_margin() -> u32 { 200 }
fn default_fps() -> u32 { 60 }
fn default_max_frame_dt() -> f32 { 0.05 } // 3 frames at 60 fps

fn default_px_per_col() -> u32 { 20 }
fn default_px_per_row() -> u32 { 40 }

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_restart() -> Vec<String> { vec!["Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }
fn default_level() -> String { "level.csv".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            tile_size: default_tile_size(),
            gravity: default_gravity(),
            jump_impulse: default_jump_impulse(),
            run_speed: default_run_speed(),
            one_way_tolerance: default_one_way_tolerance(),
            one_way_blocks_rising: false,
            actor_width: default_actor_width(),
            actor_height: default_actor_height(),
        }
    }
}

impl Default for TomlScreen {
    fn default() -> Self {
        TomlScreen {
            width: default_screen_width(),
            height: default_screen_height(),
            scroll_margin: default_scroll_margin(),
            fps: default_fps(),
            max_frame_dt: default_max_frame_dt(),
        }
    }
}

impl Default for TomlTerminal {
    fn default() -> Self {
        TomlTerminal {
            px_per_col: default_px_per_col(),
            px_per_row: default_px_per_row(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            restart: default_pad_restart(),
            quit: default_pad_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { level: default_level() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_schema(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_schema(toml_cfg, &search_dirs)
    }

    /// Parse a config document. Missing keys take their defaults; invalid
    /// sections are replaced by defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_schema(toml_cfg, &[]))
    }

    fn from_schema(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let TomlConfig { physics, screen, terminal, gamepad, general } = toml_cfg;

        let mut config = GameConfig {
            physics: PhysicsConfig {
                tile_size: physics.tile_size,
                gravity: physics.gravity,
                jump_impulse: physics.jump_impulse,
                run_speed: physics.run_speed,
                one_way_tolerance: physics.one_way_tolerance,
                one_way_blocks_rising: physics.one_way_blocks_rising,
                actor_width: physics.actor_width,
                actor_height: physics.actor_height,
            },
            screen: ScreenConfig {
                width: screen.width,
                height: screen.height,
                scroll_margin: screen.scroll_margin,
                fps: screen.fps,
                max_frame_dt: screen.max_frame_dt,
            },
            terminal: TerminalConfig {
                px_per_col: terminal.px_per_col,
                px_per_row: terminal.px_per_row,
            },
            gamepad: GamepadConfig {
                jump: gamepad.jump,
                restart: gamepad.restart,
                quit: gamepad.quit,
            },
            level_path: resolve_level_path(&general.level, search_dirs),
        };
        config.validate();
        config
    }

    /// Replace any section whose values cannot drive a simulation.
    fn validate(&mut self) {
        let p = &self.physics;
        let physics_ok = p.tile_size > 0
            && p.actor_width > 0.0
            && p.actor_height > 0.0
            && p.one_way_tolerance >= 0.0
            && [p.gravity, p.jump_impulse, p.run_speed].iter().all(|v| v.is_finite());
        if !physics_ok {
            tracing::warn!(physics = ?self.physics, "invalid [physics] section, using defaults");
            self.physics = GameConfig::default_physics();
        }

        let s = &self.screen;
        let band = s.width as f32 - 2.0 * s.scroll_margin as f32;
        let screen_ok = s.width > 0
            && s.height > 0
            && s.fps > 0
            && s.max_frame_dt > 0.0
            && band >= self.physics.actor_width
            && (s.height as f32) >= self.physics.actor_height;
        if !screen_ok {
            tracing::warn!(screen = ?self.screen, "invalid [screen] section, using defaults");
            self.screen = GameConfig::default_screen();
        }

        let t = &self.terminal;
        if t.px_per_col == 0 || t.px_per_row == 0 {
            tracing::warn!(terminal = ?self.terminal, "invalid [terminal] section, using defaults");
            self.terminal = TerminalConfig {
                px_per_col: default_px_per_col(),
                px_per_row: default_px_per_row(),
            };
        }
    }

    fn default_physics() -> PhysicsConfig {
        let d = TomlPhysics::default();
        PhysicsConfig {
            tile_size: d.tile_size,
            gravity: d.gravity,
            jump_impulse: d.jump_impulse,
            run_speed: d.run_speed,
            one_way_tolerance: d.one_way_tolerance,
            one_way_blocks_rising: d.one_way_blocks_rising,
            actor_width: d.actor_width,
            actor_height: d.actor_height,
        }
    }

    fn default_screen() -> ScreenConfig {
        let d = TomlScreen::default();
        ScreenConfig {
            width: d.width,
            height: d.height,
            scroll_margin: d.scroll_margin,
            fps: d.fps,
            max_frame_dt: d.max_frame_dt,
        }
    }
}

/// Absolute paths are used as-is; relative ones are looked up in the
/// candidate directories, falling back to CWD-relative.
fn resolve_level_path(level: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(level);
    if path.is_absolute() {
        return path;
    }
    search_dirs.iter()
        .map(|d| d.join(level))
        .find(|p| p.is_file())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/sidescroll)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/sidescroll");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/sidescroll)
    let sys = PathBuf::from("/usr/share/sidescroll");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "config.toml parse error: {e}; using defaults");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let c = GameConfig::default();
        assert_eq!(c.physics.tile_size, 40);
        assert_eq!(c.physics.gravity, 1500.0);
        assert_eq!(c.physics.jump_impulse, -700.0);
        assert_eq!(c.physics.run_speed, 300.0);
        assert_eq!(c.physics.one_way_tolerance, 10.0);
        assert!(!c.physics.one_way_blocks_rising);
        assert_eq!(c.screen.width, 1600);
        assert_eq!(c.screen.height, 900);
        assert_eq!(c.screen.left_boundary(), 200.0);
        assert_eq!(c.screen.right_boundary(), 1400.0);
        assert_eq!(c.level_path, PathBuf::from("level.csv"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let c = GameConfig::from_toml_str(
            "[physics]\ngravity = 900.0\n\n[general]\nlevel = \"/tmp/custom.csv\"\n",
        ).unwrap();
        assert_eq!(c.physics.gravity, 900.0);
        assert_eq!(c.physics.run_speed, 300.0);
        assert_eq!(c.screen.scroll_margin, 200);
        assert_eq!(c.level_path, PathBuf::from("/tmp/custom.csv"));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let c = GameConfig::from_toml_str(include_str!("../config.toml")).unwrap();
        assert_eq!(c, GameConfig::default());
    }

    #[test]
    fn one_way_blocking_can_be_enabled() {
        let c = GameConfig::from_toml_str("[physics]\none_way_blocks_rising = true\n").unwrap();
        assert!(c.physics.one_way_blocks_rising);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(GameConfig::from_toml_str("[physics\n").is_err());
    }

    #[test]
    fn margins_without_room_fall_back() {
        let c = GameConfig::from_toml_str("[screen]\nwidth = 400\nscroll_margin = 200\n").unwrap();
        assert_eq!(c.screen.width, 1600);
        assert_eq!(c.screen.scroll_margin, 200);
    }

    #[test]
    fn zero_tile_size_falls_back() {
        let c = GameConfig::from_toml_str("[physics]\ntile_size = 0\nrun_speed = 50.0\n").unwrap();
        assert_eq!(c.physics.tile_size, 40);
        assert_eq!(c.physics.run_speed, 300.0);
    }

    #[test]
    fn relative_level_found_in_search_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stage.csv"), "0,1\n").unwrap();
        let p = resolve_level_path("stage.csv", &[dir.path().to_path_buf()]);
        assert_eq!(p, dir.path().join("stage.csv"));
    }

    #[test]
    fn gamepad_lists_parse() {
        let c = GameConfig::from_toml_str("[gamepad]\njump = [\"A\", \"B\"]\n").unwrap();
        assert_eq!(c.gamepad.jump, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(c.gamepad.quit, vec!["Select".to_string()]);
    }
}
