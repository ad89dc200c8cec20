// Client-side interview flow: setup, the per-session controller and its async
// runner, the backend client, and the screen state machine.

pub mod client;
pub mod controller;
pub mod flow;
pub mod runner;
pub mod setup;
