//! Twenty questions over a self-growing binary decision tree.
//!
//! The game walks a tree of yes/no questions down to an answer and guesses it.
//! On a wrong guess it asks the player for their object and a question that
//! tells the two apart, and grafts both into the tree in place of the wrong
//! answer. Trees persist as plain text, one `Q:` or `A:` line per node.
//!
//! ```
//! use std::sync::Arc;
//! use qtree::application::Game;
//! use qtree::util::testing::ScriptedInteraction;
//!
//! let ui = Arc::new(ScriptedInteraction::default());
//! ui.push_yes_no(false)
//!     .push_line("toaster")
//!     .push_line("Is it electronic?")
//!     .push_yes_no(true);
//!
//! let mut game = Game::new(ui);
//! game.play().unwrap();
//!
//! let mut saved = Vec::new();
//! game.save(&mut saved).unwrap();
//! assert_eq!(saved, b"Q:Is it electronic?\nA:toaster\nA:computer\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
