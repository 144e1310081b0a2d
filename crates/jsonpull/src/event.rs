//! The flat event vocabulary emitted by an [`crate::stream::EventStream`].

/// The kind of a single parse event. Closed set, one-to-one with the
/// original streaming parser's event enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// No more events will ever be produced.
    End,
    /// The byte source has no data right now; try again later.
    Again,
    /// `{` consumed.
    BeginObject,
    /// `}` consumed.
    EndObject,
    /// `[` consumed.
    BeginArray,
    /// `]` consumed.
    EndArray,
    /// An object key string was recognized.
    FieldName,
    /// An integer-shaped number was recognized.
    IntValue,
    /// A float-shaped number was recognized.
    FloatValue,
    /// A string value was recognized.
    StringValue,
    /// The literal `true`.
    TrueValue,
    /// The literal `false`.
    FalseValue,
    /// The literal `null`.
    NullValue,
}

impl EventKind {
    /// Whether this event kind carries a [`crate::byte_slice::ByteSlice`] payload.
    #[must_use]
    pub fn has_payload(self) -> bool {
        matches!(
            self,
            Self::FieldName | Self::IntValue | Self::FloatValue | Self::StringValue
        )
    }
}
