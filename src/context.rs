use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT: Context;
}

struct Entry {
    key: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Request-scoped carrier of key/value data, such as a correlation id
/// propagated through a call chain.
///
/// A context is immutable: [`Context::with_value`] returns a child that
/// sees every binding of its parent plus the new one. Clones are cheap
/// and can be handed to other threads or tasks.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
}

impl Context {
    /// An empty context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Return a child context with `key` bound to `value`. A later binding
    /// of the same key shadows the earlier one.
    pub fn with_value<T>(&self, key: &'static str, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Context {
            head: Some(Arc::new(Entry {
                key,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the nearest binding of `key`.
    ///
    /// Returns `None` when the key is unbound or when the nearest binding
    /// does not hold a `T`.
    pub fn value<T: Any>(&self, key: &str) -> Option<&T> {
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            if entry.key == key {
                return entry.value.downcast_ref::<T>();
            }
            cursor = entry.parent.as_deref();
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::successors(self.head.as_deref(), |entry| entry.parent.as_deref()).map(|entry| entry.key)
    }

    /// The context installed by the innermost enclosing [`Context::scope`]
    /// or [`Context::sync_scope`], or [`Context::background`] when none is.
    pub fn current() -> Self {
        CURRENT.try_with(Context::clone).unwrap_or_default()
    }

    /// Run `fut` with this context installed as the task's current context.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }

    /// Run `f` with this context installed as the current context.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("keys", &self.keys().collect::<Vec<_>>()).finish()
    }
}
