//! Toolkit-independent motion core for the ring navigator: shared geometry,
//! the rotation state machine, the spring-driven ring, the description
//! cross-fade and the orbiting particle field.

pub mod bob;
pub mod controller;
pub mod description;
pub mod geometry;
pub mod item;
pub mod macros;
pub mod particles;
pub mod ring;
pub mod scene;
pub mod scheduler;
pub mod spring;
pub mod surface;

pub use controller::{InputPolicy, NavInput, NavKey, RotationController, Transition};
pub use geometry::{Geometry, GeometryProvider, Layout, Point, Viewport};
pub use item::{ColorToken, Item, ItemError, ItemLink, ItemList, Label};
pub use scene::{FrameStatus, Scene, SceneSettings};
pub use scheduler::{EventKind, FrameClock, Subscription, Subscriptions};
pub use surface::TrailSurface;
