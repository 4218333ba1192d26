use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, Game};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{config_template, global_config_path, Settings};
use crate::domain::TreeDisplay;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        return _completion(*shell);
    }
    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings);
    execute_with(cli, &container)
}

/// Dispatch `cli` against an already wired container.
pub fn execute_with(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        None => _play(container, None, false),
        Some(Commands::Play { file, no_save }) => _play(container, file.as_deref(), *no_save),
        Some(Commands::Show { file }) => _show(container, file.as_deref()),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(container),
            ConfigCommands::Path => _config_path(),
            ConfigCommands::Init { force } => _config_init(container, *force),
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
    }
}

#[instrument(skip(container))]
fn _play(container: &ServiceContainer, file: Option<&Path>, no_save: bool) -> CliResult<()> {
    let path = container.tree_path(file);
    debug!("tree file: {}", path.display());
    let mut game = container.open_game(&path)?;

    output::header(&format!(
        "Think of an object. I know {} of them.",
        game.tree().answer_count()
    ));
    let mut finished = 0;
    let session = play_rounds(container, &mut game, &mut finished);

    let stats = game.stats();
    output::info(&format!("Games played: {}", stats.games_played));
    output::info(&format!("Games won: {}", stats.games_won));

    // Keep what finished rounds learned even if the dialogue broke off later
    if session.is_err() && finished == 0 {
        return session;
    }
    if no_save || !container.settings.autosave {
        output::warning("tree not saved");
    } else if let Err(e) = container.store.save(&path, game.tree()) {
        if session.is_ok() {
            return Err(e.into());
        }
        output::warning(&format!("tree not saved: {e}"));
    } else {
        output::action("Saved", &path.display());
    }
    session
}

fn play_rounds(
    container: &ServiceContainer,
    game: &mut Game,
    finished: &mut usize,
) -> CliResult<()> {
    loop {
        game.play()?;
        *finished += 1;
        let again = container
            .ui
            .ask_yes_no("Do you want to play again?")
            .map_err(ApplicationError::Interaction)?;
        if !again {
            return Ok(());
        }
    }
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = container.tree_path(file);
    let tree = container.store.load(&path)?;
    output::info(&tree.to_tree_string());
    output::detail(&format!(
        "{} questions, {} answers, depth {}",
        tree.question_count(),
        tree.answer_count(),
        tree.depth()
    ));
    let irregular = tree.irregular_count();
    if irregular > 0 {
        output::warning(&format!(
            "{irregular} node(s) read as the wrong kind (questions should end with '?')"
        ));
    }
    Ok(())
}

fn _config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn _config_path() -> CliResult<()> {
    let path = global_config_path()
        .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
    output::info(&path.display());
    Ok(())
}

fn _config_init(container: &ServiceContainer, force: bool) -> CliResult<()> {
    let path = global_config_path()
        .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
    if container.fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    let io_err = |e: io::Error| InfraError::io(format!("write {}", path.display()), e);
    container.fs.ensure_parent(&path).map_err(io_err)?;
    let mut file = container.fs.create(&path).map_err(io_err)?;
    file.write_all(config_template().as_bytes())
        .and_then(|_| file.flush())
        .map_err(io_err)?;
    output::action("Created", &path.display());
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
