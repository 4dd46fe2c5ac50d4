/// Safety factor no valid design may fall below, whatever the configured floor.
pub const HARD_MIN_SAFETY_FACTOR: f64 = 4.0;

/// Budget overrun tolerated before a design is rejected outright.
pub const BUDGET_TOLERANCE: f64 = 1.5;

/// Velocity error (%) above which a still-valid design is penalized.
pub const SOFT_VELOCITY_ERROR_PERCENT: f64 = 5.0;

/// Fitness assigned when scoring produces a non-finite value or the oracle failed.
pub const FALLBACK_FITNESS: f64 = 10.0;

/// Upper bound on evaluation worker threads.
pub const MAX_EVAL_WORKERS: usize = 16;

/// Sprocket ratio window accepted by the drive-train solver.
pub const SPROCKET_RATIO_MIN: f64 = 1.2;
pub const SPROCKET_RATIO_MAX: f64 = 3.0;

/// Sprocket ratio the ranking pulls towards.
pub const PREFERRED_SPROCKET_RATIO: f64 = 1.9;

/// Driver sprocket tooth range (inclusive).
pub const DRIVER_TEETH_MIN: u32 = 17;
pub const DRIVER_TEETH_MAX: u32 = 25;

/// Largest driven sprocket considered.
pub const DRIVEN_TEETH_MAX: u32 = 120;

/// Static safety factor applied to chain tensile ratings.
pub const CHAIN_SAFETY_FACTOR: f64 = 6.0;

/// Size of the final result list when enough valid designs exist.
pub const RESULT_COUNT_FULL: usize = 15;
pub const RESULT_COUNT_REDUCED: usize = 10;

pub const GRAVITY: f64 = 9.81;
