//! # Clock（時刻プロバイダ）
//!
//! セッション履歴に記録する開始・終了時刻の取得元。
//! テストでは [`SteppingClock`] を注入し、記録される時刻を決定的にする。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 呼び出しごとに一定間隔で進むテスト用実装
///
/// 最初の呼び出しは `start` を返し、以降は `step` ずつ進んだ時刻を返す。
pub struct SteppingClock {
   next: Mutex<DateTime<Utc>>,
   step: Duration,
}

impl SteppingClock {
   pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
      Self {
         next: Mutex::new(start),
         step,
      }
   }

   /// 常に同じ時刻を返す
   pub fn fixed(at: DateTime<Utc>) -> Self {
      Self::new(at, Duration::zero())
   }
}

impl Clock for SteppingClock {
   fn now(&self) -> DateTime<Utc> {
      let mut next = self.next.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      let now = *next;
      *next = now + self.step;
      now
   }
}

#[cfg(test)]
mod tests {
   use chrono::TimeZone;
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_system_clockは呼び出し前後の時刻の間を返す() {
      let before = Utc::now();
      let result = SystemClock.now();
      let after = Utc::now();

      assert!(before <= result && result <= after);
   }

   #[test]
   fn test_stepping_clockは呼び出しごとにstepずつ進む() {
      let start = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
      let clock = SteppingClock::new(start, Duration::seconds(2));

      assert_eq!(clock.now(), start);
      assert_eq!(clock.now(), start + Duration::seconds(2));
      assert_eq!(clock.now(), start + Duration::seconds(4));
   }

   #[test]
   fn test_fixedは同じ時刻を返し続ける() {
      let at = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
      let clock = SteppingClock::fixed(at);

      assert_eq!(clock.now(), at);
      assert_eq!(clock.now(), at);
   }
}
