/// Keys the manager reacts to. Everything else passes through to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key {
    Reload,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    CreateFolder,
    Rename,
    Delete,
    MoveAcross,
    Enter,
    Ascend,
    /// Ctrl+Enter, the only key recognized while renaming.
    Confirm,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value plus the Ctrl modifier.
    pub(crate) fn from_dom(key: &str, ctrl: bool) -> Option<Key> {
        let key = match key {
            "Enter" if ctrl => Key::Confirm,
            "F5" => Key::Reload,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            "Backspace" => Key::Ascend,
            // Letter commands ignore Ctrl so browser shortcuts keep working.
            _ if ctrl => return None,
            "k" => Key::CreateFolder,
            "r" => Key::Rename,
            "d" => Key::Delete,
            "m" => Key::MoveAcross,
            _ => return None,
        };
        Some(key)
    }
}
