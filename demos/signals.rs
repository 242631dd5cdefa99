//! # Delegate Fan-Out
//!
//! A damage event wired to several subscribers, one of which unsubscribes
//! itself mid-broadcast (a one-shot shield) while another keeps score.
//!
//! Run with `RUST_LOG=trace` to watch the cursor bookkeeping.
//!
//! ## Run
//! ```bash
//! RUST_LOG=trace cargo run --example signals
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use bindcast::Delegate;

struct Health {
    points: i32,
}

impl Health {
    fn take_damage(&mut self, amount: i32) {
        self.points -= amount;
        println!(" ├─► health now {}", self.points);
    }
}

fn narrate(amount: i32) {
    println!(" ├─► {amount} damage incoming");
}

fn main() {
    env_logger::init();

    let health = Rc::new(RefCell::new(Health { points: 100 }));
    let take_damage = Health::take_damage as fn(&mut Health, i32);

    let on_damage: Rc<Delegate<i32>> = Rc::new(Delegate::new());
    on_damage.add_function(narrate as fn(i32));
    on_damage.add_method(&health, take_damage);

    // One-shot shield: halves the first hit, then removes itself.
    let hook = Rc::clone(&on_damage);
    let shielded = Rc::clone(&health);
    on_damage.add_callable(move |amount: i32| {
        shielded.borrow_mut().points += amount / 2;
        println!(" └─► shield absorbed {}, breaking", amount / 2);
        hook.remove_at(2);
    });

    println!("first hit (shield up, {} subscribers):", on_damage.len());
    on_damage.broadcast(30);

    println!("second hit (shield gone, {} subscribers):", on_damage.len());
    on_damage.broadcast(30);

    println!("final health: {}", health.borrow().points);
}
