pub mod frame;
pub mod parseable_data_record;
pub mod rht_data_record;
pub mod sonic_data_record;
pub mod tower_sonic_data_record;

pub use frame::FrameBuffer;
pub use parseable_data_record::{DataRecordParsingError, ParseableDataRecord};
pub use rht_data_record::RhtDataRecord;
pub use sonic_data_record::SonicDataRecord;
pub use tower_sonic_data_record::TowerSonicDataRecord;
