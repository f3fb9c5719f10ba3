use crate::player::mpv::MpvApi;
use crate::playlist::Playlist;

#[derive(Debug)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug)]
pub enum PlayerEvent {
    /// mpv is up and its IPC socket accepts commands.
    ApiReady(MpvApi),
    ApiUnavailable(String),
    /// The first cued video finished loading.
    Ready,
    StateChange(i8),
    Message(String),
}

#[derive(Debug)]
pub enum NetworkEvent {
    PlaylistLoaded(Playlist),
    PlaylistFailed(String),
}
