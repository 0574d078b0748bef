use crate::JobStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page finished loading; begin polling if a session is known.
    Start,
    /// A scheduled delay elapsed.
    PollDue,
    /// Well-formed response from the status endpoint.
    StatusReceived(JobStatus),
    /// Transport failure, non-success HTTP status or undecodable body.
    PollFailed,
}
