mod session_vm;

pub use session_vm::{
    DifficultyOptionVm, HudVm, ResultVm, map_difficulty_options, map_hud, map_result,
};
