//! Unit tests for mt-rendezvous.
//!
//! Handshakes are driven from scoped threads.  Where a test needs one side to
//! be blocked before the other acts, it polls the monitor's stats rather than
//! sleeping for a fixed time.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use mt_core::{Cell, PassengerId, StationId, Ticket, TrackSymbol, TrainId};
use mt_track::build_route;

use crate::{MonitorError, Ride, Rider, Station, Stop, Train, Verdict};

// ── Helpers ───────────────────────────────────────────────────────────────────

const PRICE: i64 = 10;
const FINE: i64 = 50;

fn sym(c: char) -> TrackSymbol {
    TrackSymbol::new(c).unwrap()
}

fn station(id: u32, track: char) -> Arc<Station> {
    Arc::new(Station::new(StationId(id), Cell::new(0, id as i32), sym(track), PRICE))
}

fn train(id: u32, track: char) -> Arc<Train> {
    let route = build_route(&[Cell::new(0, 0)], &[Cell::new(0, 1)], Cell::new(0, 0)).unwrap();
    Arc::new(Train::new(TrainId(id), sym(track), Arc::new(route), FINE))
}

fn rider(id: u32, balance: i64) -> Rider {
    Rider::new(PassengerId(id), balance)
}

/// Poll until `cond` holds; fail the test after five seconds.
fn eventually(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition never became true");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Register `riders` at `at`, then dock `t` once and collect their rides.
fn board_all(at: &Arc<Station>, t: &Arc<Train>, riders: &[Rider]) -> Vec<Ride> {
    thread::scope(|scope| {
        let handles: Vec<_> = riders
            .iter()
            .map(|r| scope.spawn(move || at.wait_for_train(r).unwrap()))
            .collect();
        eventually(|| at.stats().waiting == riders.len());
        assert_eq!(at.let_passengers_board(t).unwrap(), riders.len());
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

// ── Ticket sale ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod sale {
    use super::*;

    #[test]
    fn buyer_pays_and_gets_stamped_ticket() {
        let s = station(0, 'G');
        let mut r = rider(0, 100);
        let sale = thread::scope(|scope| {
            scope.spawn(|| s.serve_next_buyer().unwrap());
            s.buy_ticket(&mut r).unwrap()
        });
        assert_eq!(r.balance(), 90);
        assert_eq!(r.ticket(), Ticket::Stamped(sym('G')));
        assert_eq!(sale.balance, 90);
        assert_eq!(sale.price, PRICE);
        assert_eq!(s.stats().tickets_sold, 1);
    }

    #[test]
    fn one_sale_per_serve() {
        let s = station(0, 'G');
        let mut riders: Vec<Rider> = (0..3).map(|i| rider(i, 100)).collect();
        thread::scope(|scope| {
            for r in riders.iter_mut() {
                let s = &s;
                scope.spawn(move || s.buy_ticket(r).unwrap());
            }
            for served in 1..=3 {
                s.serve_next_buyer().unwrap();
                assert_eq!(s.stats().tickets_sold, served);
            }
        });
        assert!(riders.iter().all(|r| r.balance() == 90));
    }

    #[test]
    fn buying_again_replaces_the_ticket() {
        let s = station(0, 'B');
        let mut r = rider(0, 5);
        r.set_ticket(Ticket::Stamped(sym('G')));
        thread::scope(|scope| {
            scope.spawn(|| s.serve_next_buyer().unwrap());
            s.buy_ticket(&mut r).unwrap();
        });
        assert_eq!(r.ticket(), Ticket::Stamped(sym('B')));
        assert_eq!(r.balance(), -5, "wallets may go negative");
    }
}

// ── Inspection ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod inspection {
    use super::*;

    fn inspect(t: &Train, r: &mut Rider) -> crate::Inspection {
        thread::scope(|scope| {
            let inspector = scope.spawn(|| t.inspect_next_ticket().unwrap());
            t.show_ticket(r).unwrap();
            inspector.join().unwrap()
        })
    }

    #[test]
    fn missing_ticket_is_fined() {
        let t = train(0, 'G');
        let mut r = rider(0, 90);
        let inspection = inspect(&t, &mut r);
        assert_eq!(inspection.verdict, Verdict::Fined(FINE));
        assert_eq!(inspection.ticket, Ticket::None);
        assert_eq!(r.balance(), 140);
        assert_eq!(t.stats().fines_issued, 1);
    }

    #[test]
    fn matching_ticket_is_consumed_without_fine() {
        let t = train(0, 'G');
        let mut r = rider(0, 90);
        r.set_ticket(Ticket::Stamped(sym('G')));
        let inspection = inspect(&t, &mut r);
        assert_eq!(inspection.verdict, Verdict::Valid);
        assert_eq!(inspection.balance, 90);
        assert_eq!(r.ticket(), Ticket::None);
        assert_eq!(t.stats().tickets_checked, 1);
        assert_eq!(t.stats().fines_issued, 0);
    }

    #[test]
    fn other_track_ticket_is_fined() {
        let t = train(0, 'G');
        let mut r = rider(0, 0);
        r.set_ticket(Ticket::Stamped(sym('R')));
        let inspection = inspect(&t, &mut r);
        assert_eq!(inspection.verdict, Verdict::Fined(FINE));
        assert_eq!(inspection.ticket, Ticket::Stamped(sym('R')));
        assert_eq!(r.ticket(), Ticket::None);
    }
}

// ── Boarding ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod boarding {
    use super::*;

    #[test]
    fn every_waiter_boards_the_docked_train() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        let riders = [rider(0, 100), rider(1, 100), rider(2, 100)];
        let rides = board_all(&s, &t, &riders);

        assert_eq!(rides.len(), 3);
        assert!(rides.iter().all(|ride| ride.train().id() == t.id()));
        assert_eq!(t.stats().riders_onboard, 3);

        let stats = s.stats();
        assert_eq!(stats.waiting, 0);
        assert_eq!(stats.boarding_rounds, 1);
        assert_eq!(stats.passengers_boarded, 3);
        assert_eq!(s.docked_train(), None);
    }

    #[test]
    fn empty_platform_is_a_no_op() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        assert_eq!(s.let_passengers_board(&t).unwrap(), 0);
        assert_eq!(s.stats().boarding_rounds, 0);
        assert_eq!(t.stats().riders_onboard, 0);
    }

    #[test]
    fn successive_rounds_take_successive_waiters() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        board_all(&s, &t, &[rider(0, 100)]);
        board_all(&s, &t, &[rider(1, 100), rider(2, 100)]);
        assert_eq!(s.stats().boarding_rounds, 2);
        assert_eq!(t.stats().riders_onboard, 3);
    }

    #[test]
    fn newcomer_waits_for_the_next_train() {
        let s = station(0, 'G');
        let (t1, t2) = (train(1, 'G'), train(2, 'G'));
        let (early, late) = (rider(0, 100), rider(1, 100));

        let late_ride = thread::scope(|scope| {
            let first = scope.spawn(|| s.wait_for_train(&early).unwrap());
            eventually(|| s.stats().waiting == 1);
            assert_eq!(s.dock(&t1).unwrap(), Some(1));
            assert_eq!(first.join().unwrap().train().id(), t1.id());

            // t1 stays docked until it departs; the newcomer is held back.
            let second = scope.spawn(|| s.wait_for_train(&late).unwrap());
            eventually(|| s.stats().at_gate == 1);
            assert_eq!(s.docked_train(), Some(t1.id()));
            assert_eq!(s.stats().waiting, 0);

            assert_eq!(s.depart(&t1, 1).unwrap(), 1);
            eventually(|| s.stats().waiting == 1);
            assert_eq!(s.stats().at_gate, 0);
            assert_eq!(s.let_passengers_board(&t2).unwrap(), 1);
            second.join().unwrap()
        });

        assert_eq!(late_ride.train().id(), t2.id());
        assert_eq!(t1.stats().riders_onboard, 1);
        assert_eq!(t2.stats().riders_onboard, 1);
        assert_eq!(s.stats().boarding_rounds, 2);
        assert_eq!(s.docked_train(), None);
    }

    #[test]
    fn concurrent_conductors_take_turns_at_the_dock() {
        const RIDERS: usize = 60;
        let s = station(0, 'G');
        let trains = [train(1, 'G'), train(2, 'G')];
        let riders: Vec<Rider> = (0..RIDERS as u32).map(|i| rider(i, 100)).collect();
        let boarded = AtomicUsize::new(0);

        let (rides, rounds) = thread::scope(|scope| {
            let conductors: Vec<_> = trains
                .iter()
                .map(|t| {
                    let (s, boarded) = (&s, &boarded);
                    scope.spawn(move || {
                        let mut rounds = Vec::new();
                        while boarded.load(Ordering::SeqCst) < RIDERS {
                            let n = s.let_passengers_board(t).unwrap();
                            if n > 0 {
                                rounds.push(n);
                                boarded.fetch_add(n, Ordering::SeqCst);
                            }
                            thread::yield_now();
                        }
                        rounds
                    })
                })
                .collect();
            let passengers: Vec<_> = riders
                .iter()
                .map(|r| {
                    let s = &s;
                    scope.spawn(move || s.wait_for_train(r).unwrap())
                })
                .collect();

            let rides: Vec<Ride> = passengers.into_iter().map(|h| h.join().unwrap()).collect();
            let rounds: Vec<Vec<usize>> = conductors.into_iter().map(|h| h.join().unwrap()).collect();
            (rides, rounds)
        });

        // Each round's boarders all rode the train that opened it.
        for (t, taken) in trains.iter().zip(&rounds) {
            let on_t = rides.iter().filter(|r| r.train().id() == t.id()).count();
            assert_eq!(on_t, taken.iter().sum::<usize>());
            assert_eq!(t.stats().riders_onboard, on_t);
        }
        let stats = s.stats();
        assert_eq!(stats.boarding_rounds, rounds.iter().map(Vec::len).sum::<usize>() as u64);
        assert_eq!(stats.passengers_boarded, RIDERS as u64);
        assert_eq!((stats.waiting, stats.at_gate), (0, 0));
        assert_eq!(s.docked_train(), None);
    }
}

// ── Alighting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod alighting {
    use super::*;

    #[test]
    fn empty_train_skips_the_announcement() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        assert_eq!(t.let_passengers_off(&s).unwrap(), 0);
        assert_eq!(t.stats().stops_announced, 0);
    }

    #[test]
    fn each_rider_leaves_at_its_own_stop() {
        let (a, b, c) = (station(0, 'G'), station(1, 'G'), station(2, 'G'));
        let t = train(0, 'G');
        let mut rides = board_all(&a, &t, &[rider(0, 100), rider(1, 100)]);
        let targets = [b.id(), c.id()];

        let left_at: Vec<StationId> = thread::scope(|scope| {
            let handles: Vec<_> = rides
                .iter_mut()
                .zip(targets)
                .map(|(ride, target)| scope.spawn(move || ride.ride_to(target).unwrap().id()))
                .collect();

            assert_eq!(t.let_passengers_off(&b).unwrap(), 1);
            assert_eq!(t.stats().riders_onboard, 1);
            assert_eq!(t.let_passengers_off(&c).unwrap(), 1);

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(left_at, targets);
        let stats = t.stats();
        assert_eq!(stats.riders_onboard, 0);
        assert_eq!(stats.stops_announced, 2);
        assert_eq!(t.let_passengers_off(&a).unwrap(), 0);
    }

    #[test]
    fn rider_acknowledges_each_stop_once() {
        let (a, b, c) = (station(0, 'G'), station(1, 'G'), station(2, 'G'));
        let t = train(0, 'G');
        let mut ride = board_all(&a, &t, &[rider(0, 100)]).remove(0);

        let seen: Vec<Stop> = thread::scope(|scope| {
            let rider = scope.spawn(|| {
                let first = ride.wait_for_stop(c.id()).unwrap();
                let second = ride.wait_for_stop(c.id()).unwrap();
                vec![first, second]
            });
            assert_eq!(t.let_passengers_off(&b).unwrap(), 0);
            assert_eq!(t.let_passengers_off(&c).unwrap(), 1);
            rider.join().unwrap()
        });

        assert!(!seen[0].is_alighted());
        assert_eq!(seen[0].station().id(), b.id());
        assert!(seen[1].is_alighted());
        assert_eq!(seen[1].station().id(), c.id());
    }
}

// ── Whole journey ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod journey {
    use super::*;

    #[test]
    fn buy_ride_inspect_alight_keeps_the_fare_only() {
        let (a, b) = (station(0, 'G'), station(1, 'G'));
        let t = train(0, 'G');
        let mut r = rider(0, 100);

        thread::scope(|scope| {
            scope.spawn(|| a.serve_next_buyer().unwrap());
            a.buy_ticket(&mut r).unwrap();
        });
        assert_eq!(r.balance(), 90);

        let mut ride = board_all(&a, &t, std::slice::from_ref(&r)).remove(0);
        let inspection = thread::scope(|scope| {
            let inspector = scope.spawn(|| t.inspect_next_ticket().unwrap());
            ride.show_ticket(&mut r).unwrap();
            let conductor = scope.spawn(|| t.let_passengers_off(&b).unwrap());
            assert_eq!(ride.ride_to(b.id()).unwrap().id(), b.id());
            assert_eq!(conductor.join().unwrap(), 1);
            inspector.join().unwrap()
        });

        assert_eq!(inspection.verdict, Verdict::Valid);
        assert_eq!(r.balance(), 90);
        assert_eq!(r.ticket(), Ticket::None);
        assert_eq!(t.stats().riders_onboard, 0);
    }
}

// ── Close ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod close {
    use super::*;

    #[test]
    fn close_releases_waiting_passenger() {
        let s = station(0, 'G');
        let r = rider(0, 100);
        let result = thread::scope(|scope| {
            let waiter = scope.spawn(|| s.wait_for_train(&r).map(|_| ()));
            eventually(|| s.stats().waiting == 1);
            s.close();
            waiter.join().unwrap()
        });
        assert_eq!(result, Err(MonitorError::Closed));
        assert_eq!(s.stats().waiting, 0);
    }

    #[test]
    fn close_releases_idle_seller_and_inspector() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        let (sold, checked) = thread::scope(|scope| {
            let seller = scope.spawn(|| s.serve_next_buyer());
            let inspector = scope.spawn(|| t.inspect_next_ticket().map(|_| ()));
            // Released whether they are already blocked or arrive after close.
            s.close();
            t.close();
            (seller.join().unwrap(), inspector.join().unwrap())
        });
        assert_eq!(sold, Err(MonitorError::Closed));
        assert_eq!(checked, Err(MonitorError::Closed));
    }

    #[test]
    fn closed_monitors_refuse_new_calls() {
        let s = station(0, 'G');
        let t = train(0, 'G');
        s.close();
        t.close();
        let mut r = rider(0, 100);
        assert_eq!(s.buy_ticket(&mut r).unwrap_err(), MonitorError::Closed);
        assert_eq!(s.let_passengers_board(&t).unwrap_err(), MonitorError::Closed);
        assert_eq!(t.let_passengers_off(&s).unwrap_err(), MonitorError::Closed);
        assert_eq!(t.show_ticket(&mut r).unwrap_err(), MonitorError::Closed);
        assert_eq!(r.balance(), 100);
    }
}
