// crates/canvascore/src/events/mod.rs

mod bus;

pub use bus::{CanvasEvent, EventBus, EventEmitter, TaskEvent};
