//! UI-facing control state: which transport buttons are enabled and what
//! the toggle buttons currently say.

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PauseLabel {
    #[default]
    Pause,
    Resume,
}

impl PauseLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Resume => "Resume",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MuteLabel {
    #[default]
    Mute,
    Unmute,
}

impl MuteLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mute => "Mute",
            Self::Unmute => "Unmute",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RecordLabel {
    #[default]
    Start,
    Stop,
}

impl RecordLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start Recording",
            Self::Stop => "Stop Recording",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
    pub next: bool,
    pub previous: bool,
    pub snapshot: bool,
    pub record: bool,
    pub pause_label: PauseLabel,
    pub mute_label: MuteLabel,
    pub record_label: RecordLabel,
}

impl Default for Controls {
    /// Nothing selected yet: only mute, volume and record are live.
    fn default() -> Self {
        Self {
            play: false,
            pause: false,
            stop: false,
            next: false,
            previous: false,
            snapshot: false,
            record: true,
            pause_label: PauseLabel::Pause,
            mute_label: MuteLabel::Mute,
            record_label: RecordLabel::Start,
        }
    }
}

impl Controls {
    /// A video was chosen: transport controls light up.
    pub(super) fn on_select(&mut self) {
        self.play = true;
        self.pause = true;
        self.snapshot = true;
        self.record = true;
        self.next = true;
        self.previous = true;
    }

    pub(super) fn on_play(&mut self) {
        self.stop = true;
        self.pause = true;
    }

    pub(super) fn on_stop(&mut self) {
        self.pause_label = PauseLabel::Pause;
        self.pause = false;
        self.stop = false;
    }
}
