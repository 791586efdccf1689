use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, info};
use uuid::Uuid;

use crate::converter::VideoConverter;
use crate::error::LibraryError;
use crate::model::options::ConverterOptions;

/// One conversion running on a worker thread. The UI polls
/// [`ConversionJob::try_result`] from its event loop; dropping the job
/// detaches the worker, whose result then goes nowhere.
pub struct ConversionJob {
    id: Uuid,
    receiver: Receiver<Result<PathBuf, LibraryError>>,
}

impl ConversionJob {
    pub fn spawn(converter: VideoConverter, options: ConverterOptions) -> Self {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = converter.convert(&options);
            if sender.send(result).is_err() {
                debug!("conversion job {id} finished after being dropped");
            }
        });
        info!("spawned conversion job {id}");
        Self { id, receiver }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Non-blocking. `None` while the conversion is still running; a worker
    /// that died without reporting comes back as an error.
    pub fn try_result(&self) -> Option<Result<PathBuf, LibraryError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LibraryError::Conversion(
                "conversion worker exited unexpectedly".to_string(),
            ))),
        }
    }
}
