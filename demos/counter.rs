//! # Binding Tour
//!
//! Shows the three binding kinds behind one invoker signature:
//! - a free function
//! - a method on a shared receiver
//! - a capturing closure with owned state
//!
//! ## Run
//! ```bash
//! cargo run --example counter
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use bindcast::{CallError, Invoker};

struct Thermostat {
    degrees: i32,
}

impl Thermostat {
    fn adjust(&mut self, delta: i32) -> i32 {
        self.degrees += delta;
        self.degrees
    }
}

fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    celsius * 9 / 5 + 32
}

fn main() {
    env_logger::init();

    // Free function: static binding, no allocation.
    let convert = Invoker::function(celsius_to_fahrenheit as fn(i32) -> i32);
    println!("free function:");
    println!(" └─► 21°C = {}°F", convert.invoke(21));

    // Method: the thermostat is shared with the invoker, not copied.
    let thermostat = Rc::new(RefCell::new(Thermostat { degrees: 19 }));
    let adjust = Thermostat::adjust as fn(&mut Thermostat, i32) -> i32;
    let nudge = Invoker::method(&thermostat, adjust);
    println!("method on shared receiver:");
    println!(" ├─► +2 → {}°C", nudge.invoke(2));
    println!(" └─► -1 → {}°C", nudge.invoke(-1));

    // Capturing closure: the running total lives inside the invoker.
    let mut total = 0;
    let tally = Invoker::callable(move |x: i32| {
        total += x;
        total
    });
    println!("capturing closure:");
    println!(" ├─► tally(5)  = {}", tally.invoke(5));
    println!(" └─► tally(12) = {}", tally.invoke(12));

    // A clone owns an independent copy of the captured state.
    let fork = tally.clone();
    println!("cloned closure state:");
    println!(" ├─► original tally(1) = {}", tally.invoke(1));
    println!(" └─► fork tally(1)     = {}", fork.invoke(1));

    // Guarded dispatch on an unbound invoker.
    let unbound: Invoker<i32, i32> = Invoker::new();
    match unbound.try_invoke(0) {
        Ok(value) => println!("unexpected value: {value}"),
        Err(err) => println!("unbound invoker: {} ({})", err.as_message(), err.as_label()),
    }
    assert_eq!(unbound.try_invoke(0), Err(CallError::Unbound));
}
