use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The desktop's only input pump.
///
/// Each turn calls the handler once with `None` (a chance to tick timers and
/// redraw), then waits up to `poll_interval` for input and hands every queued
/// event to the handler in arrival order. Pointer events therefore reach the
/// drag and resize state machines strictly one at a time.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain the burst (a mouse drag produces many events) before
                // the next redraw.
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
        polls: usize,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            self.polls += 1;
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
    }

    #[test]
    fn events_are_delivered_in_order_until_quit() {
        let driver = Scripted {
            events: VecDeque::from([key('a'), key('b'), key('q'), key('z')]),
            polls: 0,
        };
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        let mut seen = Vec::new();
        let mut idle_calls = 0;
        event_loop
            .run(|_, event| {
                let Some(Event::Key(key)) = event else {
                    idle_calls += 1;
                    return Ok(ControlFlow::Continue);
                };
                if let KeyCode::Char(ch) = key.code {
                    seen.push(ch);
                    if ch == 'q' {
                        return Ok(ControlFlow::Quit);
                    }
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(seen, vec!['a', 'b', 'q']);
        assert_eq!(idle_calls, 1);
        assert_eq!(event_loop.driver().events.len(), 1);
    }

    #[test]
    fn idle_handler_can_quit() {
        let driver = Scripted {
            events: VecDeque::new(),
            polls: 0,
        };
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        let mut ticks = 0;
        event_loop
            .run(|_, _| {
                ticks += 1;
                Ok(if ticks == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(ticks, 3);
        assert_eq!(event_loop.driver().polls, 2);
    }
}
