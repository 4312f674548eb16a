//! Hand-written gRPC-style service whose methods fail through the status converter

use std::collections::HashMap;
use std::sync::Mutex;

use tonic::{Request, Response, Status};
use triage_core::{ServiceError, is_not_found};
use triage_grpc::{StatusConverter, request_context};

pub struct UserService {
    statuses: StatusConverter,
    names: Mutex<HashMap<u64, String>>,
}

impl UserService {
    pub fn new(statuses: StatusConverter) -> Self {
        Self {
            statuses,
            names: Mutex::new(HashMap::from([(1, "Ada".to_owned())])),
        }
    }

    pub fn get_name(&self, request: Request<u64>) -> Result<Response<String>, Status> {
        let ctx = request_context(&request);
        let id = *request.get_ref();

        self.lookup(id)
            .map(Response::new)
            .map_err(|err| self.statuses.convert(&ctx, &err))
    }

    pub fn create(&self, request: Request<(u64, String)>) -> Result<Response<()>, Status> {
        let ctx = request_context(&request);
        let (id, name) = request.into_inner();

        let result = Self::validate(&name).and_then(|()| match self.lookup(id) {
            Ok(_) => Err(ServiceError::conflict(format!("user {id} already exists"))),
            Err(err) if is_not_found(&err) => Ok(()),
            Err(err) => Err(err),
        });

        if let Err(err) = result {
            return Err(self.statuses.convert(&ctx, &err));
        }

        self.names.lock().unwrap().insert(id, name);
        Ok(Response::new(()))
    }

    fn lookup(&self, id: u64) -> Result<String, ServiceError> {
        self.names
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("user {id} not found")))
    }

    fn validate(name: &str) -> Result<(), ServiceError> {
        let mut err = ServiceError::validation("invalid user");

        if name.is_empty() {
            err = err.with_violation("name", "is required");
        }
        if name.chars().any(char::is_control) {
            err = err.with_violation("name", "must not contain control characters");
        }

        if triage_core::has_violations(&err) { Err(err) } else { Ok(()) }
    }
}
