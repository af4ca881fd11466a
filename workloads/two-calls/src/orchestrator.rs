//! Entry points for the three fetch patterns.

use std::sync::Arc;
use std::time::Duration;

use fetch_track::{CallError, DataRef, PendingRef, TrackOptions, TrackedCall};
use tracing::info;

use crate::source::{CallSpec, Payload, RemoteSource};

const FIRST_CALL_LABEL: &str = "first call";
const SECOND_CALL_LABEL: &str = "second call";
/// Simulated latency of the first call.
const FIRST_CALL_LATENCY: Duration = Duration::from_millis(3000);
/// Simulated latency of the second call.
const SECOND_CALL_LATENCY: Duration = Duration::from_millis(5000);

/// Values and pending flags for a pair of tracked calls.
///
/// The fields are live read handles; a read reflects each call's state
/// at the moment of read.
pub struct PairValues {
    /// Value of the first call.
    pub data1: DataRef<Payload>,
    /// Value of the second call.
    pub data2: DataRef<Payload>,
    /// Pending flag of the first call.
    pub pending1: PendingRef<Payload>,
    /// Pending flag of the second call.
    pub pending2: PendingRef<Payload>,
}

/// Pair results carrying the raw tracked-call handles as well.
pub struct PairHandles {
    /// Raw handle for the first call (manual refresh, error inspection).
    pub call1: TrackedCall<Payload>,
    /// Raw handle for the second call.
    pub call2: TrackedCall<Payload>,
    /// Value of the first call.
    pub data1: DataRef<Payload>,
    /// Value of the second call.
    pub data2: DataRef<Payload>,
    /// Pending flag of the first call.
    pub pending1: PendingRef<Payload>,
    /// Pending flag of the second call.
    pub pending2: PendingRef<Payload>,
}

fn first_call_spec() -> CallSpec {
    CallSpec::new(FIRST_CALL_LABEL, FIRST_CALL_LATENCY)
}

fn second_call_spec() -> CallSpec {
    CallSpec::new(SECOND_CALL_LABEL, SECOND_CALL_LATENCY)
}

fn track_call<S: RemoteSource>(
    source: &Arc<S>,
    spec: CallSpec,
    options: TrackOptions,
) -> TrackedCall<Payload> {
    let source = Arc::clone(source);
    TrackedCall::spawn(
        move || {
            let source = Arc::clone(&source);
            let spec = spec.clone();
            async move { source.get_data(spec).await }
        },
        options,
    )
}

/// Issue both calls in parallel; the first call blocks view readiness.
///
/// The first call is tracked with eager options and must resolve before
/// this function returns; the second stays lazy and is usually still
/// pending at that point. Both calls are initiated before either is
/// awaited. A failure of the first call propagates as `Err`.
pub async fn fetch_pair_eager_first<S: RemoteSource>(
    source: &Arc<S>,
) -> Result<PairValues, CallError> {
    let call1 = track_call(source, first_call_spec(), TrackOptions::eager());
    let call2 = track_call(source, second_call_spec(), TrackOptions::default());

    call1.ready().await?;

    let (data1, pending1) = call1.parts();
    let (data2, pending2) = call2.parts();
    Ok(PairValues {
        data1,
        data2,
        pending1,
        pending2,
    })
}

/// Issue both calls in parallel with default options, exposing the raw
/// tracked-call handles alongside the convenience read handles.
///
/// Never awaits: both calls are still pending when this returns.
pub fn fetch_pair_with_handles<S: RemoteSource>(source: &Arc<S>) -> PairHandles {
    let call1 = track_call(source, first_call_spec(), TrackOptions::default());
    let call2 = track_call(source, second_call_spec(), TrackOptions::default());

    let (data1, pending1) = call1.parts();
    let (data2, pending2) = call2.parts();
    PairHandles {
        call1,
        call2,
        data1,
        data2,
        pending1,
        pending2,
    }
}

/// Issue the calls one after another.
///
/// The second call is initiated only after the first call's data has
/// resolved, so the total latency is the sum of both calls. Completes
/// only after both calls settle; the first failure propagates as `Err`.
pub async fn fetch_pair_sequential<S: RemoteSource>(
    source: &Arc<S>,
) -> Result<PairValues, CallError> {
    info!("sequential fetch started");
    let call1 = track_call(source, first_call_spec(), TrackOptions::default());
    call1.settled().await?;

    info!("first call completed, proceeding to second call");
    let call2 = track_call(source, second_call_spec(), TrackOptions::default());
    call2.settled().await?;

    let (data1, pending1) = call1.parts();
    let (data2, pending2) = call2.parts();
    Ok(PairValues {
        data1,
        data2,
        pending1,
        pending2,
    })
}
