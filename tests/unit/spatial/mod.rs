mod resample;
