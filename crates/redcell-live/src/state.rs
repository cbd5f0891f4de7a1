use redcell_protocol::StreamEnvelope;

/// One reducer seam shared by the three push domains. `decode` lowers an
/// envelope into the domain's typed message (`None` drops the envelope with
/// no state change), `apply` is the pure transition for one message.
///
/// The three implementations keep deliberately different merge policies
/// (overwrite, last-write-wins, partial merge); the trait unifies the
/// plumbing, not the semantics.
pub trait LiveState: Default + Send + Sync + 'static {
    type Message: Send + 'static;

    fn decode(envelope: &StreamEnvelope) -> Option<Self::Message>;

    fn apply(&mut self, message: Self::Message);
}
