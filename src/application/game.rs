//! Game session: plays rounds against a question tree and grows it on losses.

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{codec, DomainError, DomainResult, Node, QuestionTree};
use crate::infrastructure::traits::Interaction;

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub games_played: u32,
    pub games_won: u32,
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} played, {} won", self.games_played, self.games_won)
    }
}

/// How a single round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The guess was confirmed.
    Won { answer: String },
    /// The guess was wrong and the user's object was added to the tree.
    Learned { object: String, question: String },
}

/// A twenty-questions session over one tree.
///
/// Owns the tree and the dialogue. Each call to [`Game::play`] walks the tree
/// from the root, asking the question at each node, until it reaches an
/// answer and guesses it.
pub struct Game {
    tree: QuestionTree,
    ui: Arc<dyn Interaction>,
    stats: GameStats,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("tree", &self.tree)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Start with the default single-answer tree.
    pub fn new(ui: Arc<dyn Interaction>) -> Self {
        Self::with_tree(ui, QuestionTree::default())
    }

    pub fn with_tree(ui: Arc<dyn Interaction>, tree: QuestionTree) -> Self {
        Self {
            tree,
            ui,
            stats: GameStats::default(),
        }
    }

    pub fn tree(&self) -> &QuestionTree {
        &self.tree
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn games_played(&self) -> u32 {
        self.stats.games_played
    }

    pub fn games_won(&self) -> u32 {
        self.stats.games_won
    }

    /// Play one round.
    ///
    /// Descends yes-left / no-right until an answer is reached, then offers it
    /// as the guess. A confirmed guess is a win; a rejected one hands over to
    /// [`Game::learn`]. `games_played` counts every round that reaches an
    /// answer, whether or not the guess gets a reply; `games_won` only the
    /// confirmed ones.
    #[instrument(level = "debug", skip(self))]
    pub fn play(&mut self) -> ApplicationResult<Outcome> {
        let mut current = self.tree.root();
        loop {
            let node = self
                .tree
                .get_node(current)
                .ok_or_else(|| DomainError::Detached(format!("{current:?}")))?;
            match node {
                Node::Question { text, yes, no } => {
                    let (yes, no) = (*yes, *no);
                    let text = text.clone();
                    current = if self.ask_yes_no(&text)? { yes } else { no };
                }
                Node::Answer { text } => {
                    let answer = text.clone();
                    self.stats.games_played += 1;
                    let confirmed =
                        self.ask_yes_no(&format!("Would your object happen to be {answer}?"))?;
                    if confirmed {
                        self.say("I win!")?;
                        self.stats.games_won += 1;
                        info!("won with {:?} ({})", answer, self.stats);
                        return Ok(Outcome::Won { answer });
                    }
                    return self.learn(current);
                }
            }
        }
    }

    /// Ask the user what they had in mind and graft it into the tree in place
    /// of the wrong guess at `wrong`.
    #[instrument(level = "debug", skip(self))]
    fn learn(&mut self, wrong: Index) -> ApplicationResult<Outcome> {
        let guessed = self
            .tree
            .get_node(wrong)
            .map(|n| n.text().to_string())
            .ok_or_else(|| DomainError::Detached(format!("{wrong:?}")))?;

        let object = self.ask_line("I lose. What is your object?")?;
        let question = self.ask_line(&format!(
            "Type a yes/no question to distinguish your item from {guessed}:"
        ))?;
        let answer_is_yes = self.ask_yes_no("And what is the answer for your object?")?;

        self.tree.learn(wrong, &object, &question, answer_is_yes)?;
        info!("learned {:?} ({})", object, self.stats);
        Ok(Outcome::Learned { object, question })
    }

    /// Write the tree to `output` in the `Q:`/`A:` line format.
    ///
    /// The sink is consumed and released before this returns.
    pub fn save<W: Write>(&self, output: W) -> std::io::Result<()> {
        codec::save(&self.tree, output)
    }

    /// Replace the tree with one read from `input`.
    ///
    /// Anything learned since the last save is discarded. On error the current
    /// tree is kept unchanged.
    #[instrument(level = "debug", skip_all)]
    pub fn load<R: BufRead>(&mut self, input: R) -> DomainResult<()> {
        let tree = codec::load(input)?;
        debug!("replacing tree with {} loaded nodes", tree.len());
        self.tree = tree;
        Ok(())
    }

    fn say(&self, message: &str) -> ApplicationResult<()> {
        self.ui.say(message).map_err(ApplicationError::Interaction)
    }

    fn ask_yes_no(&self, prompt: &str) -> ApplicationResult<bool> {
        self.ui
            .ask_yes_no(prompt)
            .map_err(ApplicationError::Interaction)
    }

    fn ask_line(&self, prompt: &str) -> ApplicationResult<String> {
        self.ui.ask_line(prompt).map_err(ApplicationError::Interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_test_setup, ScriptedInteraction};
    use rstest::{fixture, rstest};

    #[fixture]
    fn ui() -> Arc<ScriptedInteraction> {
        init_test_setup();
        Arc::new(ScriptedInteraction::default())
    }

    fn game_from(ui: &Arc<ScriptedInteraction>, tree: &str) -> Game {
        Game::with_tree(ui.clone(), codec::from_str(tree).unwrap())
    }

    #[rstest]
    fn given_default_tree_when_guess_confirmed_then_win_counted(ui: Arc<ScriptedInteraction>) {
        ui.push_yes_no(true);
        let mut game = Game::new(ui.clone());

        let outcome = game.play().unwrap();

        assert_eq!(
            outcome,
            Outcome::Won {
                answer: "computer".into()
            }
        );
        assert_eq!(game.stats(), GameStats { games_played: 1, games_won: 1 });
        assert_eq!(
            ui.prompts(),
            vec!["Would your object happen to be computer?".to_string()]
        );
        assert_eq!(ui.said(), vec!["I win!".to_string()]);
    }

    #[rstest]
    fn given_wrong_guess_with_yes_answer_when_learning_then_new_object_on_yes_branch(
        ui: Arc<ScriptedInteraction>,
    ) {
        ui.push_yes_no(false)
            .push_line("toaster")
            .push_line("Is it electronic?")
            .push_yes_no(true);
        let mut game = Game::new(ui.clone());
        let old_root = game.tree().root();

        game.play().unwrap();

        let tree = game.tree();
        let root = tree.get_node(tree.root()).unwrap();
        assert_eq!(root.text(), "Is it electronic?");
        assert_eq!(tree.get_node(root.left().unwrap()).unwrap().text(), "toaster");
        assert_eq!(root.right(), Some(old_root));
        assert_eq!(game.stats(), GameStats { games_played: 1, games_won: 0 });
    }

    #[rstest]
    fn given_wrong_guess_with_no_answer_when_learning_then_old_node_on_yes_branch(
        ui: Arc<ScriptedInteraction>,
    ) {
        ui.push_yes_no(false)
            .push_line("rock")
            .push_line("Is it electronic?")
            .push_yes_no(false);
        let mut game = Game::new(ui.clone());
        let old_root = game.tree().root();

        game.play().unwrap();

        let tree = game.tree();
        let root = tree.get_node(tree.root()).unwrap();
        assert_eq!(root.left(), Some(old_root));
        assert_eq!(tree.get_node(root.right().unwrap()).unwrap().text(), "rock");
    }

    #[rstest]
    fn given_wrong_guess_below_root_when_learning_then_parent_slot_replaced(
        ui: Arc<ScriptedInteraction>,
    ) {
        let mut game = game_from(&ui, "Q:Is it electronic?\nA:toaster\nA:computer\n");
        let electronic = game.tree().root();
        ui.push_yes_no(false)
            .push_yes_no(false)
            .push_line("dog")
            .push_line("Is it alive?")
            .push_yes_no(true);

        game.play().unwrap();

        assert_eq!(game.tree().root(), electronic);
        assert_eq!(
            codec::to_string(game.tree()),
            "Q:Is it electronic?\nA:toaster\nQ:Is it alive?\nA:dog\nA:computer\n"
        );
        assert_eq!(
            ui.prompts()[3],
            "Type a yes/no question to distinguish your item from computer:"
        );
    }

    #[rstest]
    fn given_many_rounds_when_playing_then_won_never_exceeds_played(
        ui: Arc<ScriptedInteraction>,
    ) {
        let mut game = Game::new(ui.clone());
        // win, lose+learn, win via the new branch
        ui.push_yes_no(true);
        ui.push_yes_no(false)
            .push_line("cat")
            .push_line("Is it alive?")
            .push_yes_no(true);
        ui.push_yes_no(true).push_yes_no(true);

        for round in 1..=3 {
            game.play().unwrap();
            assert_eq!(game.games_played(), round);
            assert!(game.games_won() <= game.games_played());
        }
        assert_eq!(game.games_won(), 2);
    }

    #[rstest]
    fn given_bad_input_when_loading_then_previous_tree_kept(ui: Arc<ScriptedInteraction>) {
        let mut game = game_from(&ui, "Q:Is it electronic?\nA:toaster\nA:computer\n");
        let before = game.tree().clone();

        let result = game.load("X:bogus\n".as_bytes());

        assert!(matches!(result, Err(DomainError::InvalidFormat { line_no: 1, .. })));
        assert_eq!(game.tree(), &before);
    }

    #[rstest]
    fn given_exhausted_input_at_guess_when_playing_then_round_counted(
        ui: Arc<ScriptedInteraction>,
    ) {
        let mut game = Game::new(ui.clone());
        let result = game.play();
        assert!(matches!(result, Err(ApplicationError::Interaction(_))));
        assert_eq!(game.stats(), GameStats { games_played: 1, games_won: 0 });
    }

    #[rstest]
    fn given_exhausted_input_at_question_when_playing_then_round_not_counted(
        ui: Arc<ScriptedInteraction>,
    ) {
        let mut game = game_from(&ui, "Q:Is it electronic?\nA:toaster\nA:computer\n");
        let result = game.play();
        assert!(matches!(result, Err(ApplicationError::Interaction(_))));
        assert_eq!(game.games_played(), 0);
    }
}
