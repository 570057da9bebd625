use crate::config::Labels;

/// Modal surfaces the session asks the host to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Decoded content with "Open" and "Copy" actions
    Confirm {
        /// Dialog title
        title: String,
        /// Decoded content
        message: String,
        /// Label of the open action
        open_label: String,
        /// Label of the copy action
        copy_label: String,
    },
    /// The decoded content is not an openable URL
    InvalidUrl {
        /// Dialog title
        title: String,
        /// Explanation
        message: String,
        /// Label of the acknowledge button
        acknowledge_label: String,
    },
}

impl Dialog {
    pub(crate) fn confirm(labels: &Labels, content: &str) -> Self {
        Dialog::Confirm {
            title: labels.confirm_title.clone(),
            message: content.to_string(),
            open_label: labels.open.clone(),
            copy_label: labels.copy.clone(),
        }
    }

    pub(crate) fn invalid_url(labels: &Labels) -> Self {
        Dialog::InvalidUrl {
            title: labels.invalid_url_title.clone(),
            message: labels.invalid_url_message.clone(),
            acknowledge_label: labels.acknowledge.clone(),
        }
    }
}

/// User's choice in the confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// Open the content as a URL
    Open,
    /// Copy the content to the clipboard
    Copy,
}
