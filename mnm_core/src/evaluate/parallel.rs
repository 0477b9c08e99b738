//! Evaluation of many models on a small pool of worker threads
//!
//! Models only share the read-only network, so each one is evaluated independently. Jobs are
//! handed out through a channel and the results are put back in input order.
use std::thread;

use crossbeam_channel::unbounded;
use log::debug;

use crate::candidate::model::CandidateModel;
use crate::evaluate::ModelEvaluation;
use crate::network::network::{Network, NetworkError};

/// Apply `f` to every item on up to `processes` scoped threads, keeping the input order
pub fn parallel_map<T, R, F>(items: &[T], processes: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = processes.clamp(1, items.len().max(1));
    if workers == 1 {
        return items.iter().map(f).collect();
    }

    let (job_tx, job_rx) = unbounded::<(usize, &T)>();
    let (result_tx, result_rx) = unbounded::<(usize, R)>();
    for job in items.iter().enumerate() {
        job_tx
            .send(job)
            .expect("job receiver is alive until the scope ends");
    }
    drop(job_tx);

    debug!("Evaluating {} items on {} workers", items.len(), workers);
    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let f = &f;
            scope.spawn(move || {
                while let Ok((index, item)) = job_rx.recv() {
                    result_tx
                        .send((index, f(item)))
                        .expect("result receiver is alive until the scope ends");
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<(usize, R)> = result_rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, r)| r).collect()
}

/// Evaluate every model, in the order given
pub fn evaluate_all(
    network: &Network,
    models: &[CandidateModel],
    processes: usize,
) -> Vec<Result<ModelEvaluation, NetworkError>> {
    parallel_map(models, processes, |model| ModelEvaluation::new(network, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::intervention::{Intervention, ModelItem};
    use crate::test_utils::small_cell;

    #[test]
    fn order_is_kept() {
        let items: Vec<usize> = (0..100).collect();
        let doubled = parallel_map(&items, 4, |x| x * 2);
        assert_eq!(doubled, (0..100).map(|x| x * 2).collect::<Vec<_>>());
        assert!(parallel_map(&Vec::<usize>::new(), 4, |x| *x).is_empty());
    }

    #[test]
    fn parallel_and_serial_evaluations_agree() {
        let (network, base) = small_cell();
        let models = vec![
            base.clone(),
            base.revised("starved", [Intervention::Remove(ModelItem::setup("glc", "v1", "ext"))]),
            base.revised("r3", [Intervention::Add(ModelItem::activity("R3"))]),
            base.revised("unknown", [Intervention::Add(ModelItem::activity("R9"))]),
        ];
        let serial = evaluate_all(&network, &models, 1);
        let parallel = evaluate_all(&network, &models, 3);
        assert_eq!(serial.len(), 4);
        for (s, p) in serial.iter().zip(&parallel) {
            match (s, p) {
                (Ok(s), Ok(p)) => {
                    assert_eq!(s.model_id(), p.model_id());
                    assert_eq!(s.active_network(), p.active_network());
                }
                (Err(s), Err(p)) => assert_eq!(s, p),
                _ => panic!("serial and parallel evaluations differ"),
            }
        }
        assert!(parallel[3].is_err());
        assert!(!parallel[1].as_ref().unwrap().active("growth"));
    }
}
