use std::fmt;
use tracing::debug;

/// A change notification. `operation` is the name listeners filter on.
pub trait Event: fmt::Debug {
    fn operation(&self) -> &'static str;
}

type Listener<E> = Box<dyn FnMut(&E)>;

/// Listener list owned by an auction, play or deal.
///
/// Listeners run synchronously, in registration order, after the change
/// they describe has been applied.
pub struct Notifier<E> {
    source: &'static str,
    listeners: Vec<(Option<&'static str>, Listener<E>)>,
}

impl<E: Event> Notifier<E> {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            listeners: Vec::new(),
        }
    }

    /// Registers `listener` for every operation.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) {
        self.listeners.push((None, Box::new(listener)));
    }

    /// Registers `listener` for one operation name only.
    pub fn subscribe_to(&mut self, operation: &'static str, listener: impl FnMut(&E) + 'static) {
        self.listeners.push((Some(operation), Box::new(listener)));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: E) {
        let operation = event.operation();
        debug!(source = self.source, operation, payload = ?event, "changed");
        for (filter, listener) in self.listeners.iter_mut() {
            if filter.map_or(true, |f| f == operation) {
                listener(&event);
            }
        }
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("source", &self.source)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    enum Ping {
        Ping(u32),
        Pong,
    }

    impl Event for Ping {
        fn operation(&self) -> &'static str {
            match self {
                Ping::Ping(_) => "ping",
                Ping::Pong => "pong",
            }
        }
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new("test");

        let log = seen.clone();
        notifier.subscribe(move |e: &Ping| log.borrow_mut().push(format!("all:{}", e.operation())));
        let log = seen.clone();
        notifier.subscribe_to("pong", move |_| log.borrow_mut().push("pong-only".to_string()));
        assert_eq!(notifier.len(), 2);

        notifier.emit(Ping::Ping(1));
        notifier.emit(Ping::Pong);

        assert_eq!(
            *seen.borrow(),
            vec!["all:ping", "all:pong", "pong-only"]
        );
    }

    #[test]
    fn test_emit_without_listeners() {
        let mut notifier: Notifier<Ping> = Notifier::new("test");
        assert!(notifier.is_empty());
        notifier.emit(Ping::Ping(7));
        assert_eq!(format!("{:?}", notifier), "Notifier { source: \"test\", listeners: 0 }");
    }
}
