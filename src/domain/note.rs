/// Final output of one run, handed to exactly one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNote {
    pub text: String,
    pub suggested_title: String,
}

impl RenderedNote {
    pub fn new(text: String, suggested_title: String) -> Self {
        Self {
            text,
            suggested_title,
        }
    }
}
