mod background;
mod generation;
mod pool;
mod verification;
