//! Handler trait, type erasure and the async fault wrapper.
//!
//! # How async handlers are stored
//!
//! The router needs to hold handlers of *different* types in a single
//! `HashMap<Method, Tree>`. Rust collections can only hold one concrete type,
//! so we use **trait objects** (`dyn ErasedHandler`) to hide the concrete
//! handler type behind a common interface and store everything uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn show(state: S, req: Request) -> Result<Reply, Fault> { … }
//!        ↓ router.on(Method::Get, "/campgrounds/{id}", show)
//! show.into_boxed_handler()                        ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))                        ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler<S> = Arc<dyn ErasedHandler<S>>
//! handler.call(state, req)  at request time        ← one vtable dispatch
//!        ↓
//! catch_faults(show(state, req))                   ← BoxFuture
//! ```
//!
//! # Fault forwarding
//!
//! Every handler is fallible: it resolves to `Result<impl IntoResponse,
//! Fault>`. [`catch_faults`] wraps the handler's future so that both an `Err`
//! and a panic come out as a [`Fault`] for the router to forward to its
//! terminal fault handler. Registration always goes through it, so no
//! handler failure can be lost.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::error;

use crate::fault::Fault;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`] or
/// the [`Fault`] to forward.
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place; it cannot move it in memory after the first poll.
/// `Send + 'static` let tokio move the future across threads safely.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Fault>> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, state: S, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
///
/// `#[doc(hidden)] pub` for the same reason as `ErasedHandler`.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(state: S, req: Request) -> Result<impl IntoResponse, Fault>
/// ```
///
/// `S` is the router state, cloned into every call. The trait is **sealed**
/// (via the private `Sealed` supertrait): only the blanket impl below can
/// satisfy it.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed<S> {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R, S> private::Sealed<S> for F
where
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R, S> Handler<S> for F
where
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R, S> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(S, Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: S, req: Request) -> BoxFuture {
        catch_faults((self.0)(state, req))
    }
}

// ── Async fault wrapper ───────────────────────────────────────────────────────

/// Wraps a fallible handler future so every failure surfaces as a [`Fault`].
///
/// - `Ok(reply)` becomes `Ok(response)`
/// - `Err(fault)` is passed through untouched
/// - a panic while polling becomes a `500` fault with the generic message;
///   the panic payload is logged, never shown to the user
pub fn catch_faults<Fut, R>(fut: Fut) -> BoxFuture
where
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    Box::pin(async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(reply)) => Ok(reply.into_response()),
            Ok(Err(fault)) => Err(fault),
            Err(panic) => {
                error!(panic = panic_message(panic.as_ref()), "handler panicked");
                Err(Fault::internal(Fault::GENERIC_MESSAGE))
            }
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
