use crate::game::GameView;
use crate::menu::MainMenu;
use crate::scoreboard::ScoreBoard;
use crate::util::Globals;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    pub(crate) fn new(globals: Globals) -> App {
        App {
            screen: Screen::Menu(MainMenu::new(globals)),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Menu(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Scores(ref board) => {
                terminal.draw(|frame| board.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Menu(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Scores(ref mut board) => board.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.switch(screen);
        }
        Ok(())
    }

    /// Replace the current screen, shutting down the game loop if a game is
    /// being left
    fn switch(&mut self, screen: Screen) {
        if let Screen::Game(game) = std::mem::replace(&mut self.screen, screen) {
            game.stop();
        }
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Menu(MainMenu),
    Game(GameView),
    Scores(ScoreBoard),
    Quit,
}
