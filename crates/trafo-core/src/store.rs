use crate::records::RecordRepository;
use crate::stats::StatsRepository;

pub trait Store {
    type Records<'a>: RecordRepository
    where
        Self: 'a;
    type Stats<'a>: StatsRepository
    where
        Self: 'a;

    fn records(&self) -> Self::Records<'_>;
    fn stats(&self) -> Self::Stats<'_>;
}
