//! Command dispatch against temp tree files and a scripted player

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use qtree::cli::commands::execute_with;
use qtree::cli::Cli;
use qtree::config::Settings;
use qtree::exitcode;
use qtree::infrastructure::di::ServiceContainer;
use qtree::infrastructure::traits::RealFileSystem;
use qtree::util::testing::{init_test_setup, ScriptedInteraction};

#[fixture]
fn ui() -> Arc<ScriptedInteraction> {
    init_test_setup();
    Arc::new(ScriptedInteraction::default())
}

fn container(tree_file: &Path, autosave: bool, ui: &Arc<ScriptedInteraction>) -> ServiceContainer {
    let settings = Settings {
        tree_file: tree_file.to_path_buf(),
        autosave,
        ..Settings::default()
    };
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), ui.clone())
}

fn run(args: &[&str], container: &ServiceContainer) -> Result<(), i32> {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    execute_with(&cli, container).map_err(|e| e.exit_code())
}

#[rstest]
fn given_no_tree_file_when_playing_and_losing_then_learned_tree_saved(
    ui: Arc<ScriptedInteraction>,
) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    let container = container(&tree_file, true, &ui);
    ui.push_yes_no(false)
        .push_line("toaster")
        .push_line("Is it electronic?")
        .push_yes_no(true)
        .push_yes_no(false); // play again?

    // Act
    run(&["qtree", "play"], &container).unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(&tree_file).unwrap(),
        "Q:Is it electronic?\nA:toaster\nA:computer\n"
    );
    assert_eq!(ui.prompts().last().unwrap(), "Do you want to play again?");
}

#[rstest]
fn given_explicit_file_when_playing_two_rounds_then_file_used_and_updated(
    ui: Arc<ScriptedInteraction>,
) {
    let temp = TempDir::new().unwrap();
    let configured = temp.path().join("configured.txt");
    let explicit = temp.path().join("explicit.txt");
    fs::write(&explicit, "Q:Is it electronic?\nA:toaster\nA:computer\n").unwrap();
    let container = container(&configured, true, &ui);
    // round 1: win with toaster
    ui.push_yes_no(true).push_yes_no(true).push_yes_no(true);
    // round 2: miss computer, learn rock
    ui.push_yes_no(false)
        .push_yes_no(false)
        .push_line("rock")
        .push_line("Is it heavy?")
        .push_yes_no(true)
        .push_yes_no(false);

    run(&["qtree", "play", explicit.to_str().unwrap()], &container).unwrap();

    assert!(!configured.exists());
    assert_eq!(
        fs::read_to_string(&explicit).unwrap(),
        "Q:Is it electronic?\nA:toaster\nQ:Is it heavy?\nA:rock\nA:computer\n"
    );
    assert_eq!(ui.remaining(), 0);
}

#[rstest]
#[case(&["qtree", "play", "--no-save"], true)]
#[case(&["qtree", "play"], false)]
fn given_saving_disabled_when_playing_then_file_untouched(
    ui: Arc<ScriptedInteraction>,
    #[case] args: &[&str],
    #[case] autosave: bool,
) {
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    let container = container(&tree_file, autosave, &ui);
    ui.push_yes_no(true).push_yes_no(false);

    run(args, &container).unwrap();

    assert!(!tree_file.exists());
}

#[rstest]
fn given_malformed_tree_when_showing_then_data_error_exit_code(ui: Arc<ScriptedInteraction>) {
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    fs::write(&tree_file, "X:bogus\n").unwrap();
    let container = container(&tree_file, true, &ui);

    assert_eq!(run(&["qtree", "show"], &container), Err(exitcode::DATAERR));
}

#[rstest]
fn given_valid_tree_when_showing_then_succeeds(ui: Arc<ScriptedInteraction>) {
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    fs::write(&tree_file, "Q:Is it electronic?\nA:toaster\nA:computer\n").unwrap();
    let container = container(&tree_file, true, &ui);

    assert_eq!(run(&["qtree", "show"], &container), Ok(()));
    assert!(ui.prompts().is_empty());
}

#[rstest]
fn given_closed_input_when_playing_then_noinput_and_nothing_saved(
    ui: Arc<ScriptedInteraction>,
) {
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    let container = container(&tree_file, true, &ui);

    assert_eq!(run(&["qtree", "play"], &container), Err(exitcode::NOINPUT));
    assert!(!tree_file.exists());
}

#[rstest]
fn given_learned_round_when_input_closes_at_replay_prompt_then_tree_still_saved(
    ui: Arc<ScriptedInteraction>,
) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    let container = container(&tree_file, true, &ui);
    ui.push_yes_no(false)
        .push_line("toaster")
        .push_line("Is it electronic?")
        .push_yes_no(true);

    // Act
    let result = run(&["qtree", "play"], &container);

    // Assert
    assert_eq!(result, Err(exitcode::NOINPUT));
    assert_eq!(
        fs::read_to_string(&tree_file).unwrap(),
        "Q:Is it electronic?\nA:toaster\nA:computer\n"
    );
}

#[rstest]
fn given_input_closing_in_second_round_when_playing_then_first_round_kept(
    ui: Arc<ScriptedInteraction>,
) {
    let temp = TempDir::new().unwrap();
    let tree_file = temp.path().join("tree.txt");
    let container = container(&tree_file, true, &ui);
    ui.push_yes_no(false)
        .push_line("toaster")
        .push_line("Is it electronic?")
        .push_yes_no(true)
        .push_yes_no(true); // play again, then nothing more

    assert_eq!(run(&["qtree", "play"], &container), Err(exitcode::NOINPUT));
    assert_eq!(
        fs::read_to_string(&tree_file).unwrap(),
        "Q:Is it electronic?\nA:toaster\nA:computer\n"
    );
}
