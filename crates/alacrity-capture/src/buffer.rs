//! 최근 캡처 버퍼.
//!
//! 고정 용량 FIFO. 가득 차면 가장 오래된 레코드부터 밀어낸다.
//! `append`/`clear`는 단일 잠금 아래에서 실행되므로 서로 배타적이다.
//!
//! 버퍼는 세대(epoch) 번호를 가진다. `clear()`는 같은 잠금 안에서 세대를 올리고,
//! 파이프라인은 틱 승인 시점의 세대가 아직 유효할 때만 레코드를 추가한다.
//! 따라서 `stop()` 이전에 시작된 파이프라인의 늦은 추가는 버려진다.

use alacrity_core::models::capture::CaptureRecord;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// 버퍼 세대 번호
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureEpoch(u64);

struct BufferInner {
    records: VecDeque<CaptureRecord>,
    capacity: usize,
    epoch: u64,
}

impl BufferInner {
    fn evict_overflow(&mut self) {
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }
}

/// 최근 캡처 버퍼 (FIFO, 최대 크기 제한)
pub struct RecentCaptureBuffer {
    inner: Mutex<BufferInner>,
}

impl RecentCaptureBuffer {
    /// 새 버퍼 생성
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BufferInner {
                records: VecDeque::with_capacity(capacity),
                capacity,
                epoch: 0,
            }),
        }
    }

    /// 꼬리에 추가, 용량 초과분은 머리부터 제거
    pub fn append(&self, record: CaptureRecord) {
        let mut inner = self.inner.lock();
        inner.records.push_back(record);
        inner.evict_overflow();
    }

    /// 세대가 일치할 때만 추가.
    ///
    /// 그 사이 `clear()`가 있었다면 레코드를 버리고 `false`를 반환한다.
    pub fn append_in_epoch(&self, epoch: CaptureEpoch, record: CaptureRecord) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch.0 {
            debug!(
                "이전 세대 레코드 폐기: record_epoch={}, current_epoch={}",
                epoch.0, inner.epoch
            );
            return false;
        }
        inner.records.push_back(record);
        inner.evict_overflow();
        true
    }

    /// 읽기 전용 복사본 (오래된 순)
    pub fn snapshot(&self) -> Vec<CaptureRecord> {
        self.inner.lock().records.iter().cloned().collect()
    }

    /// 전체 비우기 + 세대 증가
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.records.clear();
        inner.epoch += 1;
    }

    /// 현재 세대
    pub fn epoch(&self) -> CaptureEpoch {
        CaptureEpoch(self.inner.lock().epoch)
    }

    /// 용량 변경 (줄어들면 오래된 레코드부터 제거)
    pub fn set_capacity(&self, capacity: usize) {
        let mut inner = self.inner.lock();
        inner.capacity = capacity;
        inner.evict_overflow();
    }

    /// 최대 용량
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// 현재 레코드 수
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone};
    use image::RgbaImage;
    use std::sync::Arc;

    fn make_record(seq: i64) -> CaptureRecord {
        let base = Local.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        CaptureRecord::new(
            base + Duration::seconds(seq),
            RgbaImage::new(4, 4),
            format!("tick {seq}"),
        )
    }

    fn texts(records: &[CaptureRecord]) -> Vec<String> {
        records.iter().map(|r| r.extracted_text.clone()).collect()
    }

    #[test]
    fn keeps_last_records_in_order() {
        let buffer = RecentCaptureBuffer::new(5);
        for seq in 1..=7 {
            buffer.append(make_record(seq));
        }

        let snapshot = buffer.snapshot();
        assert_eq!(
            texts(&snapshot),
            vec!["tick 3", "tick 4", "tick 5", "tick 6", "tick 7"]
        );
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let buffer = RecentCaptureBuffer::new(3);
        for seq in 0..20 {
            buffer.append(make_record(seq));
            assert!(buffer.len() <= 3);
        }
    }

    #[test]
    fn timestamps_non_decreasing() {
        let buffer = RecentCaptureBuffer::new(4);
        for seq in 0..9 {
            buffer.append(make_record(seq));
        }
        let snapshot = buffer.snapshot();
        assert!(snapshot
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn snapshot_is_detached_from_live_buffer() {
        let buffer = RecentCaptureBuffer::new(5);
        buffer.append(make_record(1));

        let snapshot = buffer.snapshot();
        buffer.append(make_record(2));
        buffer.clear();

        assert_eq!(texts(&snapshot), vec!["tick 1"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn snapshot_shares_image_allocation() {
        let buffer = RecentCaptureBuffer::new(2);
        buffer.append(make_record(1));

        let a = buffer.snapshot();
        let b = buffer.snapshot();
        assert!(Arc::ptr_eq(&a[0].image, &b[0].image));
    }

    #[test]
    fn clear_advances_epoch() {
        let buffer = RecentCaptureBuffer::new(5);
        let before = buffer.epoch();
        buffer.clear();
        assert!(buffer.epoch() > before);
    }

    #[test]
    fn stale_epoch_append_is_discarded() {
        let buffer = RecentCaptureBuffer::new(5);
        let epoch = buffer.epoch();

        buffer.clear();

        assert!(!buffer.append_in_epoch(epoch, make_record(1)));
        assert!(buffer.is_empty());

        assert!(buffer.append_in_epoch(buffer.epoch(), make_record(2)));
        assert_eq!(texts(&buffer.snapshot()), vec!["tick 2"]);
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let buffer = RecentCaptureBuffer::new(5);
        for seq in 1..=5 {
            buffer.append(make_record(seq));
        }

        buffer.set_capacity(2);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(texts(&buffer.snapshot()), vec!["tick 4", "tick 5"]);
    }

    #[test]
    fn concurrent_append_and_clear() {
        let buffer = Arc::new(RecentCaptureBuffer::new(5));

        let writers: Vec<_> = (0..4)
            .map(|t| {
                let buffer = buffer.clone();
                std::thread::spawn(move || {
                    for seq in 0..200 {
                        buffer.append(make_record(t * 1_000 + seq));
                        if seq % 50 == 0 {
                            buffer.clear();
                        }
                    }
                })
            })
            .collect();

        for handle in writers {
            handle.join().unwrap();
        }

        assert!(buffer.len() <= 5);
    }
}
