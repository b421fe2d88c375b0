use byob_schedule::{MemoryStore, ScheduleManager};

pub struct AppState {
    pub manager: ScheduleManager<MemoryStore>,
}
