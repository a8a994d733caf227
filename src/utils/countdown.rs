// ============================================================================
// COUNTDOWN - Tiempo restante hasta el fin de una rifa
// ============================================================================
// Se recalcula desde el reloj en cada tick (no se decrementa), así el
// jitter del timer no acumula error.
// ============================================================================

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Desglose de `end_time - now` (ambos en segundos); todo a cero si ya pasó
    pub fn between(end_time: i64, now: i64) -> Self {
        let remaining = end_time.saturating_sub(now);
        if remaining <= 0 {
            return Self::default();
        }

        Self {
            days: remaining / SECS_PER_DAY,
            hours: (remaining % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (remaining % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: remaining % SECS_PER_MINUTE,
        }
    }

    /// Desde el reloj del sistema (en WASM, `Date.now()` vía chrono/wasmbind)
    pub fn until(end_time: i64) -> Self {
        Self::between(end_time, chrono::Utc::now().timestamp())
    }

    /// Segmentos con dos dígitos: [días, horas, minutos, segundos]
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}
