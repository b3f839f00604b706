// implemented by components holding subscriptions or timers that must be torn down explicitly
pub trait Destroyable {
    fn destroy(&mut self);
}
