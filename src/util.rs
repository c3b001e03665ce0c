use crate::prelude::*;
use npyz::WriterBuilder;

/// Elements of a tensor in row-major order, whatever its memory layout.
pub fn to_row_major_vec(tensor: TsrView) -> Vec<f64> {
    tensor.reshape(-1).to_vec()
}

/// Read a numpy `.npy` file of `f64` values.
pub fn tensor_from_npy(fname: &str) -> Result<Tsr> {
    let device = DeviceTsr::default();
    let bytes = std::fs::read(fname)?;
    let npy = npyz::NpyFile::new(&bytes[..])?;
    let shape = npy.shape().iter().map(|&x| x as usize).collect::<Vec<usize>>();
    let order = npy.order();
    let data = npy.into_vec::<f64>()?;
    let tensor = match order {
        npyz::Order::C => rt::asarray((data, shape.c(), &device)),
        npyz::Order::Fortran => rt::asarray((data, shape.f(), &device)),
    };
    Ok(tensor)
}

/// Write a tensor as a c-contiguous numpy `.npy` file.
pub fn tensor_to_npy(tensor: TsrView, fname: &str) -> Result<()> {
    let shape = tensor.shape().iter().map(|&n| n as u64).collect::<Vec<u64>>();
    let data = to_row_major_vec(tensor);
    let mut file = std::io::BufWriter::new(std::fs::File::create(fname)?);
    let mut writer = npyz::WriteOptions::new().default_dtype().shape(&shape).writer(&mut file).begin_nd()?;
    writer.extend(data)?;
    writer.finish()?;
    Ok(())
}
