//! Cancellable 1 Hz countdown handle.
//!
//! The interval is owned by this handle, not a loose global id: dropping it
//! clears the interval and frees the callback closure. The app stores at
//! most one `Countdown` and replaces it wholesale, so two live intervals
//! (the duplicate auto-advance bug class) cannot occur.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Window;

pub struct Countdown {
    window: Window,
    handle: i32,
    _tick: Closure<dyn FnMut()>,
}

impl Countdown {
    pub fn start(window: &Window, tick: Closure<dyn FnMut()>) -> Result<Countdown, JsValue> {
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            1000,
        )?;
        Ok(Countdown {
            window: window.clone(),
            handle,
            _tick: tick,
        })
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}
