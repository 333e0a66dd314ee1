//! CLI command implementations

pub mod io;
pub mod list;
pub mod script;
pub mod shell;

use pixkit_engine::Engine;

/// Engine with the built-in commands plus `load` and `save`.
pub fn new_engine() -> Engine {
    let mut engine = Engine::new();
    for info in io::COMMANDS {
        engine.register(*info);
    }
    engine
}
