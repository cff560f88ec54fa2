//! Snapshot rendering interface.
//!
//! Rendering is stateless with respect to the relay: a renderer consumes
//! whole snapshots and owns nothing the relay depends on. The trait is the
//! whole contract — how a snapshot becomes pixels (SVG circles, terminal
//! cells, GPU quads) is entirely up to the client.

use crate::domain::Snapshot;

/// Consumes snapshots and produces a visual representation.
///
/// Each call receives a complete snapshot that fully replaces whatever was
/// rendered before; implementations should not accumulate state across
/// calls beyond their own drawing resources.
pub trait Renderer {
    /// Renders one complete snapshot.
    fn render(&mut self, snapshot: &Snapshot);
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    /// Test renderer that remembers only the last snapshot it was given.
    #[derive(Debug, Default)]
    struct LastSeen {
        last: Option<Snapshot>,
        calls: usize,
    }

    impl Renderer for LastSeen {
        fn render(&mut self, snapshot: &Snapshot) {
            self.last = Some(snapshot.clone());
            self.calls += 1;
        }
    }

    #[test]
    fn renderer_replaces_prior_state() {
        let Ok(first) = Snapshot::parse(r#"[{"pin":1,"x":0,"y":0,"actuation":0.1}]"#) else {
            panic!("test snapshot must parse");
        };
        let Ok(second) = Snapshot::parse(r#"[{"pin":1,"x":0,"y":0,"actuation":0.9}]"#) else {
            panic!("test snapshot must parse");
        };

        let mut renderer = LastSeen::default();
        renderer.render(&first);
        renderer.render(&second);

        assert_eq!(renderer.calls, 2);
        assert_eq!(renderer.last, Some(second));
    }
}
