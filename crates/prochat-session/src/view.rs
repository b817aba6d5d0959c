#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Notice,
}

/// The one status line shown above the form or the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

/// Transient, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    banner: Option<Banner>,
    dark_mode: bool,
}

impl ViewState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            banner: None,
            dark_mode,
        }
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text: text.into(),
        });
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            kind: BannerKind::Notice,
            text: text.into(),
        });
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip dark mode, returning the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}
