//! Inbound relay commands.
//!
//! Members text a short code to the group's messaging number. Codes are
//! resolved through [`COMMAND_TABLE`]; matching trims the message and
//! ignores case.

/// A recognized inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayCommand {
    Menu,
    ListProposals,
    Vote,
    MyVotes,
    Propose,
    Winners,
}

/// Code → command lookup table.
pub const COMMAND_TABLE: &[(&str, RelayCommand)] = &[
    ("menu", RelayCommand::Menu),
    ("menú", RelayCommand::Menu),
    ("help", RelayCommand::Menu),
    ("0", RelayCommand::Menu),
    ("1", RelayCommand::ListProposals),
    ("2", RelayCommand::Vote),
    ("3", RelayCommand::MyVotes),
    ("4", RelayCommand::Propose),
    ("5", RelayCommand::Winners),
];

impl RelayCommand {
    /// Menu entries in display order, with their numeric code.
    pub const MENU: [(&'static str, RelayCommand); 5] = [
        ("1", RelayCommand::ListProposals),
        ("2", RelayCommand::Vote),
        ("3", RelayCommand::MyVotes),
        ("4", RelayCommand::Propose),
        ("5", RelayCommand::Winners),
    ];

    /// Resolve an inbound message body.
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        COMMAND_TABLE
            .iter()
            .find(|(code, _)| *code == key)
            .map(|(_, command)| *command)
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::ListProposals => "See games",
            Self::Vote => "Vote",
            Self::MyVotes => "My votes",
            Self::Propose => "Propose a game",
            Self::Winners => "See winners",
        }
    }
}
