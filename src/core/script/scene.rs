//=========================================================================
// Scene Script
//=========================================================================
//
// Scripted background/foreground layers for a game mode.
//
// Architecture:
// ```text
//   mode.draw_background(video)
//       → Lua: <tablespace>.DrawBackground()
//            → Video.draw_image(path, x, y) ──queue──┐
//       ← drain queue → VideoService::move_to/draw_* ┘
// ```
//
// A scene script is a Lua chunk that defines a global table named after
// the file stem (its tablespace). Every hook is optional:
//
//   Initialize()  Reset()  Update(ms)
//   DrawBackground()  DrawForeground()  DrawPostEffects()
//
// Hook failures are logged and otherwise ignored; only loading errors
// are reported to the caller.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, warn};
use mlua::{Function, Lua, Table, Value};

//=== Internal Dependencies ===============================================

use super::ScriptError;
use crate::core::video::{Color, VideoService};

//=== ScriptDraw ==========================================================

/// Draw call issued from Lua, queued until the hook returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptDraw {
    Image { path: String, x: f32, y: f32 },
    Text { text: String, x: f32, y: f32 },
}

type DrawQueue = Rc<RefCell<Vec<ScriptDraw>>>;

//=== SceneScript =========================================================

/// A loaded scene script with its own Lua state.
pub struct SceneScript {
    lua: Lua,
    path: PathBuf,
    tablespace: String,
    queue: DrawQueue,
}

impl SceneScript {
    //--- Construction -----------------------------------------------------

    /// Loads the script at `path`; its tablespace is the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|source| ScriptError::Read { path: path.to_path_buf(), source })?;
        let tablespace = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self::from_source(path, &tablespace, &source)
    }

    /// Runs `source` and checks that it defines the global table `tablespace`.
    pub fn from_source(
        path: impl AsRef<Path>,
        tablespace: &str,
        source: &str,
    ) -> Result<Self, ScriptError> {
        let path = path.as_ref().to_path_buf();
        let lua = Lua::new();
        let queue: DrawQueue = Rc::new(RefCell::new(Vec::new()));

        let lua_err = |source: mlua::Error| ScriptError::Lua { path: path.clone(), source };

        install_video_api(&lua, &queue).map_err(lua_err)?;
        lua.load(source)
            .set_name(path.display().to_string())
            .exec()
            .map_err(lua_err)?;

        let defined = matches!(
            lua.globals().get::<_, Value>(tablespace).map_err(lua_err)?,
            Value::Table(_)
        );
        if !defined {
            return Err(ScriptError::MissingTablespace { path, name: tablespace.to_string() });
        }

        debug!("Loaded scene script '{}' ({})", path.display(), tablespace);
        Ok(Self { lua, path, tablespace: tablespace.to_string(), queue })
    }

    pub fn tablespace(&self) -> &str {
        &self.tablespace
    }

    /// Returns `true` if the tablespace defines a function named `hook`.
    pub fn has_hook(&self, hook: &str) -> bool {
        self.namespace()
            .and_then(|ns| ns.get::<_, Option<Function>>(hook))
            .map_or(false, |f| f.is_some())
    }

    //--- Lifecycle Hooks --------------------------------------------------

    pub fn initialize(&self) {
        self.call_hook("Initialize", None);
    }

    pub fn reset(&self) {
        self.call_hook("Reset", None);
    }

    pub fn update(&self, elapsed_ms: u32) {
        self.call_hook("Update", Some(elapsed_ms));
    }

    //--- Draw Hooks -------------------------------------------------------

    pub fn draw_background(&self, video: &mut dyn VideoService) {
        self.call_hook("DrawBackground", None);
        self.flush(video);
    }

    pub fn draw_foreground(&self, video: &mut dyn VideoService) {
        self.call_hook("DrawForeground", None);
        self.flush(video);
    }

    pub fn draw_post_effects(&self, video: &mut dyn VideoService) {
        self.call_hook("DrawPostEffects", None);
        self.flush(video);
    }

    //--- Internal Helpers -------------------------------------------------

    fn namespace(&self) -> mlua::Result<Table<'_>> {
        self.lua.globals().get(self.tablespace.as_str())
    }

    fn call_hook(&self, hook: &str, arg: Option<u32>) {
        let result = self.namespace().and_then(|ns| {
            match ns.get::<_, Option<Function>>(hook)? {
                Some(function) => function.call::<_, ()>(arg),
                None => Ok(()),
            }
        });

        if let Err(e) = result {
            warn!("{}: {}.{} failed: {}", self.path.display(), self.tablespace, hook, e);
            // Draw calls issued before the failure are discarded
            self.queue.borrow_mut().clear();
        }
    }

    fn flush(&self, video: &mut dyn VideoService) {
        for draw in self.queue.borrow_mut().drain(..) {
            match draw {
                ScriptDraw::Image { path, x, y } => {
                    video.move_to(x, y);
                    video.draw_image(&path);
                }
                ScriptDraw::Text { text, x, y } => {
                    video.move_to(x, y);
                    video.draw_text(&text, Color::WHITE);
                }
            }
        }
    }
}

//=== Video API ===========================================================

/// Installs the global `Video` table scripts draw through.
fn install_video_api(lua: &Lua, queue: &DrawQueue) -> mlua::Result<()> {
    let video = lua.create_table()?;

    let images = Rc::clone(queue);
    video.set(
        "draw_image",
        lua.create_function(move |_, (path, x, y): (String, f32, f32)| {
            images.borrow_mut().push(ScriptDraw::Image { path, x, y });
            Ok(())
        })?,
    )?;

    let texts = Rc::clone(queue);
    video.set(
        "draw_text",
        lua.create_function(move |_, (text, x, y): (String, f32, f32)| {
            texts.borrow_mut().push(ScriptDraw::Text { text, x, y });
            Ok(())
        })?,
    )?;

    lua.globals().set("Video", video)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::{DrawCommand, VideoManager};

    const SCENE: &str = r#"
        boot = { elapsed = 0, resets = 0 }

        function boot.Reset()
            boot.resets = boot.resets + 1
        end

        function boot.Update(ms)
            boot.elapsed = boot.elapsed + ms
        end

        function boot.DrawBackground()
            Video.draw_image("img/backdrops/boot/sky.png", 0, 0)
        end

        function boot.DrawForeground()
            Video.draw_text("elapsed " .. boot.elapsed, 10, 20)
        end
    "#;

    fn scene() -> SceneScript {
        SceneScript::from_source("dat/config/boot.lua", "boot", SCENE).expect("valid scene")
    }

    #[test]
    fn missing_tablespace_is_fatal() {
        let err = SceneScript::from_source("boot.lua", "boot", "title = {}").err().unwrap();
        assert!(matches!(err, ScriptError::MissingTablespace { ref name, .. } if name == "boot"));
    }

    #[test]
    fn syntax_error_is_fatal() {
        let err = SceneScript::from_source("boot.lua", "boot", "boot = {").err().unwrap();
        assert!(matches!(err, ScriptError::Lua { .. }));
    }

    #[test]
    fn draw_hooks_forward_to_video() {
        let scene = scene();
        let mut video = VideoManager::new();

        scene.update(16);
        scene.update(17);
        scene.draw_background(&mut video);
        scene.draw_foreground(&mut video);

        assert_eq!(
            video.take_draw_commands(),
            vec![
                DrawCommand::Image { path: "img/backdrops/boot/sky.png".into(), x: 0.0, y: 0.0 },
                DrawCommand::Text { text: "elapsed 33".into(), x: 10.0, y: 20.0, color: Color::WHITE },
            ]
        );
    }

    #[test]
    fn absent_hooks_are_skipped() {
        let scene = scene();
        let mut video = VideoManager::new();

        assert!(!scene.has_hook("DrawPostEffects"));
        scene.draw_post_effects(&mut video);
        scene.initialize();

        assert!(video.take_draw_commands().is_empty());
    }

    #[test]
    fn failing_hook_is_contained() {
        let scene = SceneScript::from_source(
            "boot.lua",
            "boot",
            r#"
                boot = {}
                function boot.DrawBackground()
                    Video.draw_image("half.png", 0, 0)
                    error("boom")
                end
            "#,
        )
        .unwrap();
        let mut video = VideoManager::new();

        scene.draw_background(&mut video);

        assert!(video.take_draw_commands().is_empty());
    }

    #[test]
    fn load_uses_file_stem_as_tablespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boot.lua");
        fs::write(&path, SCENE).unwrap();

        let scene = SceneScript::load(&path).unwrap();
        assert_eq!(scene.tablespace(), "boot");
        assert!(scene.has_hook("Reset"));
    }
}
