//! A floating desktop window manager.
//!
//! The core ([`window`], [`launcher`], [`desktop`]) is independent of any
//! terminal: windows live in workspace units and pointer input arrives as
//! [`input::PointerEvent`]s. The front end ([`runner`], [`view`],
//! [`panel`], [`drivers`]) paints a session with `ratatui` and feeds it
//! crossterm mouse events.

pub mod apps;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod desktop;
pub mod drivers;
pub mod event_loop;
pub mod geometry;
pub mod input;
pub mod keybindings;
pub mod launcher;
pub mod log_buffer;
pub mod notifications;
pub mod panel;
pub mod runner;
pub mod start_menu;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod view;
pub mod window;
