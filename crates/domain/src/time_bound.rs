//! # 時刻パラメータの二重指定の統合
//!
//! 一部のオペレーションは、旧形式（タイムゾーンなしのローカル時刻）と
//! UTC 形式の 2 種類の時刻パラメータを受け付ける。
//! 内部では UTC の 1 フィールドに正規化し、境界でのみ旧形式を変換する。
//!
//! ## 規則
//!
//! - 旧形式と UTC 形式は排他（両方指定すると [`DomainError::MutuallyExclusive`]）
//! - 旧形式はホストのローカルタイムゾーンで解釈して UTC に変換する
//! - 夏時間の切り替えで存在しない時刻はエラー、重複する時刻は早い方を採用する

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::DomainError;

/// 旧形式と UTC 形式の時刻パラメータの組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBoundInput {
    /// UTC 形式のパラメータ名（例: `utc-start-date`）
    pub utc_parameter:    &'static str,
    /// 旧形式のパラメータ名（例: `start-date`）
    pub legacy_parameter: &'static str,
    pub utc:              Option<DateTime<Utc>>,
    pub legacy:           Option<NaiveDateTime>,
}

impl TimeBoundInput {
    pub fn new(
        utc_parameter: &'static str,
        legacy_parameter: &'static str,
        utc: Option<DateTime<Utc>>,
        legacy: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            utc_parameter,
            legacy_parameter,
            utc,
            legacy,
        }
    }

    /// 旧形式が指定されているか（非推奨警告の判定用）
    pub fn uses_legacy(&self) -> bool {
        self.legacy.is_some()
    }

    /// ホストのローカルタイムゾーンで正規化する
    pub fn resolve(&self) -> Result<Option<DateTime<Utc>>, DomainError> {
        self.resolve_in(&Local)
    }

    /// 指定したタイムゾーンで旧形式を解釈し、UTC に正規化する
    pub fn resolve_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<Option<DateTime<Utc>>, DomainError> {
        match (self.utc, self.legacy) {
            (Some(_), Some(_)) => Err(DomainError::MutuallyExclusive {
                first:  self.legacy_parameter,
                second: self.utc_parameter,
            }),
            (Some(utc), None) => Ok(Some(utc)),
            (None, Some(local)) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "--{} の時刻 {local} はローカルタイムゾーンに存在しません",
                        self.legacy_parameter
                    ))
                }),
            (None, None) => Ok(None),
        }
    }

    /// 必須の時刻としてホストのローカルタイムゾーンで正規化する
    pub fn resolve_required(&self) -> Result<DateTime<Utc>, DomainError> {
        self.resolve_required_in(&Local)
    }

    /// 必須の時刻として正規化する
    pub fn resolve_required_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, DomainError> {
        self.resolve_in(tz)?
            .ok_or(DomainError::MissingParameter(self.utc_parameter))
    }
}

/// 開始・終了時刻の前後関係を検証する
pub fn ensure_ordered(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), DomainError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(DomainError::Validation(format!(
            "開始時刻（{}）が終了時刻（{}）より後になっています",
            start.to_rfc3339(),
            end.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, LocalResult, NaiveDate};

    use super::*;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    /// 2024 年の米国東部時間を模したタイムゾーン
    ///
    /// 3/10 02:00 に EST(-5) から EDT(-4) へ進み、11/3 02:00 に EST へ戻る。
    #[derive(Debug, Clone, Copy)]
    struct Eastern2024;

    impl Eastern2024 {
        fn est() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn edt() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }
    }

    impl TimeZone for Eastern2024 {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Eastern2024
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // 早い時刻（UTC で先になる EDT）を先に並べる
            let candidates: Vec<FixedOffset> = [Self::edt(), Self::est()]
                .into_iter()
                .filter(|offset| {
                    let utc = *local - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
                    self.offset_from_utc_datetime(&utc) == *offset
                })
                .collect();
            match candidates.as_slice() {
                [] => LocalResult::None,
                [single] => LocalResult::Single(*single),
                [earlier, later, ..] => LocalResult::Ambiguous(*earlier, *later),
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let dst_start = NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap();
            let dst_end = NaiveDate::from_ymd_opt(2024, 11, 3)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap();
            if dst_start <= *utc && *utc < dst_end {
                Self::edt()
            } else {
                Self::est()
            }
        }
    }

    fn local(month: u32, day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn naive(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_utc形式のみの指定はそのまま返る() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let input = TimeBoundInput::new("utc-start-date", "start-date", Some(utc), None);

        assert_eq!(input.resolve_in(&jst()), Ok(Some(utc)));
        assert!(!input.uses_legacy());
    }

    #[test]
    fn test_旧形式はローカル時刻としてutcに変換される() {
        let input = TimeBoundInput::new("utc-start-date", "start-date", None, Some(naive(9)));

        let resolved = input.resolve_in(&jst()).unwrap();

        assert_eq!(
            resolved,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert!(input.uses_legacy());
    }

    #[test]
    fn test_両方指定すると排他エラーになる() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let input = TimeBoundInput::new("utc-start-date", "start-date", Some(utc), Some(naive(9)));

        assert_eq!(
            input.resolve_in(&jst()),
            Err(DomainError::MutuallyExclusive {
                first:  "start-date",
                second: "utc-start-date",
            })
        );
    }

    #[test]
    fn test_必須の時刻が未指定ならmissing_parameterになる() {
        let input = TimeBoundInput::new("utc-end-time", "end-time", None, None);

        assert_eq!(
            input.resolve_required_in(&jst()),
            Err(DomainError::MissingParameter("utc-end-time"))
        );
    }

    #[test]
    fn test_夏時間の開始で存在しない時刻はエラーになる() {
        let input =
            TimeBoundInput::new("utc-start-date", "start-date", None, Some(local(3, 10, 2, 30)));

        let result = input.resolve_in(&Eastern2024);

        assert!(matches!(result, Err(DomainError::Validation(msg)) if msg.contains("--start-date")));
    }

    #[test]
    fn test_夏時間の終了で重複する時刻は早い方を採用する() {
        let input =
            TimeBoundInput::new("utc-start-date", "start-date", None, Some(local(11, 3, 1, 30)));

        let resolved = input.resolve_in(&Eastern2024).unwrap();

        // EDT(-4) として解釈した 05:30 UTC が早い方
        assert_eq!(
            resolved,
            Some(Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_夏時間中の時刻は夏時間のオフセットで変換される() {
        let input =
            TimeBoundInput::new("utc-start-date", "start-date", None, Some(local(7, 1, 12, 0)));

        assert_eq!(
            input.resolve_in(&Eastern2024),
            Ok(Some(Utc.with_ymd_and_hms(2024, 7, 1, 16, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_ensure_orderedは逆転した範囲を拒否する() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();

        assert!(ensure_ordered(Some(earlier), Some(later)).is_ok());
        assert!(ensure_ordered(Some(later), None).is_ok());
        assert!(ensure_ordered(Some(later), Some(earlier)).is_err());
    }
}
