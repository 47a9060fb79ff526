/// Fire-and-forget audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A control zone was hit
    Collision,
    /// The session was won
    Win,
}

/// Audio/speech collaborator interface
///
/// Implementations must not block; the session never waits on a cue.
pub trait CueSink: Send + 'static {
    /// Play a sound cue
    fn play(&mut self, cue: Cue);

    /// Speak a word out loud
    fn speak(&mut self, text: &str);
}
