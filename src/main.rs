//! Surviving MBTA entry point
//!
//! Web: draws the strip on `#canvas` and wires keyboard input.
//! Native: runs a headless attract-mode session and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use surviving_mbta::platform::web::{WebGame, init};
    use surviving_mbta::renderer::FrameView;

    struct Host {
        game: WebGame,
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl Host {
        /// Draw the strip as a row of squares across the middle of the canvas
        fn render(&self) {
            let size = self.game.display_size();
            let cell = self.width / size.max(1) as f64;
            let y = (self.height - cell) / 2.0;

            self.ctx.set_fill_style_str("#101018");
            self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

            let pixels = self.game.pixels();
            for (i, px) in pixels.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let color = format!("rgba({},{},{},{})", px[0], px[1], px[2], px[3] as f64 / 255.0);
                self.ctx.set_fill_style_str(&color);
                self.ctx.fill_rect(i as f64 * cell, y, cell, cell);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let view = FrameView::capture(self.game.state());

            for p in &view.players {
                let id = match p.id {
                    surviving_mbta::sim::PlayerId::One => "hud-p1",
                    surviving_mbta::sim::PlayerId::Two => "hud-p2",
                };
                if let Some(el) = document.get_element_by_id(id) {
                    let text = if p.dead && p.lives > 0 {
                        format!("{} lives - respawning in {}s", p.lives, p.respawn_seconds_left)
                    } else {
                        format!("{} lives", p.lives)
                    };
                    el.set_text_content(Some(&text));
                }
            }

            if let Some(el) = document.get_element_by_id("tunnel-warning") {
                let class = if view.tunnel.warning { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        init();
        log::info!("Surviving MBTA starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let game = WebGame::new();
        canvas.set_width((game.display_size() as f32 * game.pixel_size()) as u32);
        canvas.set_height((game.pixel_size() * 4.0) as u32);

        let host = Rc::new(RefCell::new(Host {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            game,
            ctx,
        }));

        setup_input_handlers(host.clone())?;
        request_animation_frame(host);
        Ok(())
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if host.borrow_mut().game.key_down(&event.key(), event.repeat()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut().game.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: held keys never see their keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                host.borrow_mut().game.release_keys();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            if h.game.advance(time) > 0 {
                h.render();
                h.update_hud();
            }
        }
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Surviving MBTA (native) starting...");
    log::info!("Native mode runs the attract demo headless - use the web build to play");

    let mut args = std::env::args().skip(1);
    let seconds: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(60);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });

    let summary = attract::run(surviving_mbta::Settings::load(), seed, seconds);
    println!("\n{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use std::fmt;

    use surviving_mbta::Settings;
    use surviving_mbta::renderer::FrameBuffer;
    use surviving_mbta::sim::{DeathCause, GameEvent, GameState, TickInput, tick};

    #[derive(Debug, Default)]
    pub struct Summary {
        pub seed: u64,
        pub frames: u64,
        pub games: u32,
        pub tunnels: u32,
        pub deaths_neglect: u32,
        pub deaths_tunnel: u32,
        pub deaths_tree: u32,
        pub strip: String,
    }

    impl fmt::Display for Summary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Seed:      {}", self.seed)?;
            writeln!(f, "Frames:    {}", self.frames)?;
            writeln!(f, "Games:     {}", self.games)?;
            writeln!(f, "Tunnels:   {}", self.tunnels)?;
            writeln!(
                f,
                "Deaths:    {} neglect, {} tunnel, {} tree",
                self.deaths_neglect, self.deaths_tunnel, self.deaths_tree
            )?;
            write!(f, "Last strip: [{}]", self.strip)
        }
    }

    /// Let the autopilot play for `seconds` of simulated time
    pub fn run(settings: Settings, seed: u64, seconds: u64) -> Summary {
        let frames = seconds * settings.assumed_fps as u64;
        let mut state = GameState::new(settings, seed);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut summary = Summary {
            seed,
            ..Default::default()
        };

        for _ in 0..frames {
            tick(&mut state, &input);
            for event in &state.events {
                match *event {
                    GameEvent::GameStarted => summary.games += 1,
                    GameEvent::TunnelPassed => summary.tunnels += 1,
                    GameEvent::PlayerKilled { cause, .. } => match cause {
                        DeathCause::Neglect => summary.deaths_neglect += 1,
                        DeathCause::Tunnel => summary.deaths_tunnel += 1,
                        DeathCause::Tree => summary.deaths_tree += 1,
                    },
                    _ => {}
                }
            }
        }
        summary.frames = state.frame;

        let mut fb = FrameBuffer::new(state.settings.display_size);
        fb.compose(&state);
        summary.strip = fb
            .pixels()
            .iter()
            .map(|px| match (px.is_transparent(), px.r, px.b) {
                (true, _, _) => '.',
                (false, 255, 0) => '1',
                (false, 0, 255) => '2',
                (false, 20, _) => 'T',
                _ => '=',
            })
            .collect();
        summary
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_attract_run_is_reproducible() {
            let a = run(Settings::default(), 4, 30);
            let b = run(Settings::default(), 4, 30);
            assert_eq!(a.frames, 1800);
            assert!(a.games >= 1);
            assert_eq!(a.games, b.games);
            assert_eq!(a.strip, b.strip);
            assert_eq!(a.deaths_tree, b.deaths_tree);
            assert_eq!(a.strip.chars().count(), 30);
        }
    }
}
