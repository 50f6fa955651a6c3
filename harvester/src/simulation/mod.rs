pub mod ant;
pub mod economy;
pub mod food;
pub mod geometry;
pub mod recruitment;
mod sim;
mod timer;

// Re-export key types for easier imports
pub use ant::{Ant, AntKey, AntState, NestOutcome};
pub use economy::{DropSchedule, FoodEconomy, SpawnOutcome};
pub use food::{Food, FoodKey, Nest};
pub use geometry::{Aabb, Arena, Collidable, Movable};
pub use recruitment::RecruitmentController;
pub use sim::Simulation;
pub use timer::Timer;
