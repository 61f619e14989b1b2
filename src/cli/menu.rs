//! The shell's numbered menu

/// One entry of the nine-item menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    CreateDictionary,
    AddWord,
    ReplaceWord,
    DeleteWord,
    SearchTranslation,
    ExportToFile,
    ListDictionaries,
    ListWords,
    Exit,
}

impl MenuItem {
    /// Menu entries in display order; position + 1 is the selection number.
    pub const ALL: [MenuItem; 9] = [
        MenuItem::CreateDictionary,
        MenuItem::AddWord,
        MenuItem::ReplaceWord,
        MenuItem::DeleteWord,
        MenuItem::SearchTranslation,
        MenuItem::ExportToFile,
        MenuItem::ListDictionaries,
        MenuItem::ListWords,
        MenuItem::Exit,
    ];

    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|item| *item == self)
            .map_or(0, |i| i + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::CreateDictionary => "Create dictionary",
            MenuItem::AddWord => "Add word and translations",
            MenuItem::ReplaceWord => "Replace word translations",
            MenuItem::DeleteWord => "Delete word",
            MenuItem::SearchTranslation => "Find word translation",
            MenuItem::ExportToFile => "Export dictionary to file",
            MenuItem::ListDictionaries => "List dictionaries",
            MenuItem::ListWords => "List all words and translations in a dictionary",
            MenuItem::Exit => "Exit",
        }
    }

    /// Match a selection like `"3"` (surrounding whitespace ignored).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|item| item.number().to_string() == input)
    }
}
